//! Two-phase log analysis.
//!
//! Phase 1 runs `git log` as a child process while a single parser worker
//! drains its stdout and sends finished [`CommitRecord`]s over a channel.
//! The calling thread is the only consumer and owns the [`PairWeights`]
//! table. Phase 2 starts once the channel has closed, the worker has been
//! joined and the child has exited successfully.

use std::io::BufReader;
use std::process::{Child, Stdio};
use std::thread;

use anyhow::{Result, bail};
use crossbeam_channel::unbounded;
use tracing::{debug, info, warn};

use crate::engine::cochange::PairWeights;
use crate::engine::log::parse_log_stream;
use crate::engine::tree::{GitRepo, TrackedFileSet};
use crate::error::ActivityError;
use crate::models::commit::{CommitRecord, ParseStats};

/// Everything phase 1 produced.
#[derive(Debug, Clone)]
pub struct LogSummary {
    pub weights: PairWeights,
    /// Records received by the aggregator
    pub commits_analyzed: usize,
    pub stats: ParseStats,
}

impl GitRepo {
    /// Stream `git log --name-only` through the parser into a [`PairWeights`] table.
    ///
    /// `max_count` limits the log to that many of the most recent commits.
    pub fn stream_log(
        &self,
        tracked: &TrackedFileSet,
        max_count: Option<usize>,
    ) -> Result<LogSummary> {
        let mut cmd = self.command();
        // The parser needs the `commit <id>` header layout whatever the user's config says
        cmd.args([
            "log",
            "--name-only",
            "--pretty=medium",
            "--no-decorate",
            "--no-color",
        ]);
        if let Some(n) = max_count {
            cmd.arg("-n").arg(n.to_string());
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ActivityError::log_tool(format!("Failed to run git log: {e}")))?;

        let Some(stdout) = child.stdout.take() else {
            reap(&mut child);
            bail!(ActivityError::log_tool("git log stdout was not captured"));
        };

        let (tx, rx) = unbounded::<CommitRecord>();

        let (weights, commits_analyzed, parsed) = thread::scope(|s| {
            // The pipe is drained here, before anyone waits on the child.
            let worker = s.spawn(move || {
                parse_log_stream(BufReader::new(stdout), tracked, |record| {
                    // Only fails if the receiver is gone, which outlives this worker
                    let _ = tx.send(record);
                })
            });

            let mut weights = PairWeights::new();
            let mut commits = 0usize;
            for record in rx.iter() {
                commits += 1;
                weights.add_record(&record);
            }

            let parsed = worker
                .join()
                .unwrap_or_else(|_| Err(ActivityError::log_tool("log parser worker panicked").into()));
            (weights, commits, parsed)
        });

        let stats = match parsed {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "log stream aborted");
                reap(&mut child);
                return Err(e);
            }
        };

        let status = child
            .wait()
            .map_err(|e| ActivityError::log_tool(format!("Failed to wait for git log: {e}")))?;
        if !status.success() {
            bail!(ActivityError::log_tool(format!(
                "git log exited with {status}"
            )));
        }

        debug!(?stats, "log stream parsed");
        info!(
            commits = commits_analyzed,
            pairs = weights.len() / 2,
            max_weight = weights.max_weight(),
            "co-change table built"
        );

        Ok(LogSummary {
            weights,
            commits_analyzed,
            stats,
        })
    }
}

/// Stop a child we are abandoning so it does not linger.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
