//! Streaming parser for `git log --name-only` output.
//!
//! The log is a sequence of blocks:
//!
//! ```text
//! commit <id>
//! Author: ...
//! Date:   ...
//!
//!     message text, indented by four spaces
//!
//! path/of/changed/file
//! another/file
//! ```
//!
//! Lines are classified one at a time so the producer never has to be
//! buffered in full. Message text is recognised only by its four-space
//! indent; an unindented message line that happens to equal a tracked path
//! is counted as a changed file.

use std::io::BufRead;

use anyhow::Result;
use tracing::trace;

use crate::engine::tree::TrackedFileSet;
use crate::error::ActivityError;
use crate::models::commit::{CommitRecord, ParseStats};

const COMMIT_PREFIX: &str = "commit ";
const MESSAGE_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No `commit ` header seen yet
    AwaitingCommit,
    /// Between a `commit ` header and the first blank line
    InHeader,
    /// After the header; unindented lines are candidate paths
    InBody,
}

/// Line-at-a-time state machine producing [`CommitRecord`]s.
pub struct LogParser<'a> {
    tracked: &'a TrackedFileSet,
    state: ParserState,
    current: Option<CommitRecord>,
    stats: ParseStats,
}

impl<'a> LogParser<'a> {
    pub fn new(tracked: &'a TrackedFileSet) -> Self {
        Self {
            tracked,
            state: ParserState::AwaitingCommit,
            current: None,
            stats: ParseStats::default(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Feed one line with its terminator already removed.
    ///
    /// Returns the previous commit's record when `line` opens a new commit.
    pub fn feed_line(&mut self, line: &str) -> Option<CommitRecord> {
        self.stats.lines_read += 1;

        if let Some(id) = line.strip_prefix(COMMIT_PREFIX) {
            let finished = self.take_current();
            self.current = Some(CommitRecord::new(id));
            self.state = ParserState::InHeader;
            self.stats.commits_seen += 1;
            return finished;
        }

        if line.is_empty() {
            if self.state != ParserState::AwaitingCommit {
                self.state = ParserState::InBody;
            }
            return None;
        }

        if self.state != ParserState::InBody || line.starts_with(MESSAGE_INDENT) {
            return None;
        }

        if self.tracked.contains(line) {
            if let Some(record) = self.current.as_mut() {
                record.files.push(line.to_string());
                self.stats.paths_kept += 1;
            }
        } else {
            trace!(path = line, "dropping path not tracked at HEAD");
            self.stats.paths_dropped += 1;
        }
        None
    }

    /// End of stream: hand back the last open record, if it has any files.
    pub fn finish(mut self) -> (Option<CommitRecord>, ParseStats) {
        let last = self.take_current();
        (last, self.stats)
    }

    fn take_current(&mut self) -> Option<CommitRecord> {
        let record = self.current.take().filter(|r| !r.files.is_empty())?;
        self.stats.records_emitted += 1;
        Some(record)
    }
}

/// Drive a [`LogParser`] over `reader`, passing each finalized record to `sink`.
///
/// Any read error other than a clean end of stream is a `StreamReadFailure`.
pub fn parse_log_stream<R: BufRead>(
    mut reader: R,
    tracked: &TrackedFileSet,
    mut sink: impl FnMut(CommitRecord),
) -> Result<ParseStats> {
    let mut parser = LogParser::new(tracked);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ActivityError::stream_read(&e))?;
        if n == 0 {
            break;
        }

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);

        if let Some(record) = parser.feed_line(&line) {
            sink(record);
        }
    }

    let (last, stats) = parser.finish();
    if let Some(record) = last {
        sink(record);
    }
    Ok(stats)
}
