use serde::Serialize;

/// One rendered edge between two co-changing files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub file_a: String,
    pub file_b: String,
    /// Number of commits where both files changed
    pub weight: u32,
    /// weight / max_weight * max_width
    pub penwidth: f64,
}

/// Result of a full analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityGraph {
    /// Commits that touched at least one tracked file
    pub commits_analyzed: usize,
    pub max_weight: u32,
    pub min_occurrence: u32,
    pub max_width: u32,
    pub edges: Vec<Edge>,
}
