/// A commit and the tracked files it touched, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    /// May repeat a path if the log reported it twice for this commit
    pub files: Vec<String>,
}

impl CommitRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            files: Vec::new(),
        }
    }
}

/// Counters collected while scanning a log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_read: usize,
    pub commits_seen: usize,
    pub records_emitted: usize,
    pub paths_kept: usize,
    /// Candidate paths not present at HEAD
    pub paths_dropped: usize,
}
