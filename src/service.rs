use anyhow::{Result, bail};
use tracing::debug;

use crate::engine::render::{self, RenderOptions};
use crate::engine::tree::GitRepo;
use crate::error::{ActivityError, ErrorCode};
use crate::models::graph::ActivityGraph;

// ---------------------------------------------------------------------------
// ActivityService: file listing -> log pipeline -> edge selection
// ---------------------------------------------------------------------------

pub struct ActivityService {
    repo: GitRepo,
}

/// Parameters for one analysis run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeParams {
    pub render: RenderOptions,
    /// Only read this many of the most recent commits
    pub max_count: Option<usize>,
}

impl Default for ActivityService {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityService {
    /// Analyze the repository in the current working directory.
    pub fn new() -> Self {
        Self::for_repo(GitRepo::current())
    }

    pub fn for_repo(repo: GitRepo) -> Self {
        Self { repo }
    }

    /// Build the co-change graph for the repository.
    pub fn analyze(&self, params: &AnalyzeParams) -> Result<ActivityGraph> {
        debug!(
            min_occurrence = params.render.min_occurrence,
            max_width = params.render.max_width,
            max_count = ?params.max_count,
            "analyze called"
        );

        if params.max_count == Some(0) {
            bail!(ActivityError::new(
                ErrorCode::InvalidRequest,
                "max_count must be at least 1, got 0",
            ));
        }

        let tracked = self.repo.tracked_files()?;
        let summary = self.repo.stream_log(&tracked, params.max_count)?;
        let edges = render::select_edges(&summary.weights, &params.render);

        debug!(edges = edges.len(), "edges selected");

        Ok(ActivityGraph {
            commits_analyzed: summary.commits_analyzed,
            max_weight: summary.weights.max_weight(),
            min_occurrence: params.render.min_occurrence,
            max_width: params.render.max_width,
            edges,
        })
    }
}

impl ActivityGraph {
    /// Graphviz rendering of the selected edges.
    pub fn to_dot(&self) -> String {
        render::render_dot(&self.edges)
    }
}
