use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Result, bail};
use tracing::debug;

use crate::error::ActivityError;

/// Every path tracked at HEAD. Only used as a membership filter.
#[derive(Debug, Clone, Default)]
pub struct TrackedFileSet {
    paths: HashSet<String>,
}

impl TrackedFileSet {
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TrackedFileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The git executable and the working directory it runs in.
#[derive(Debug, Clone)]
pub struct GitRepo {
    program: PathBuf,
    dir: PathBuf,
}

impl Default for GitRepo {
    fn default() -> Self {
        Self::current()
    }
}

impl GitRepo {
    /// The repository addressed by the process's working directory.
    pub fn current() -> Self {
        Self::at(".")
    }

    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            program: PathBuf::from("git"),
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Use a different git executable.
    pub fn with_program(mut self, program: impl AsRef<Path>) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        // Raw UTF-8 paths so both listings agree and the renderer quotes once
        cmd.args(["-c", "core.quotePath=false"]);
        cmd.current_dir(&self.dir);
        cmd
    }

    /// List every file tracked at HEAD (`git ls-tree -r HEAD --name-only`).
    pub fn tracked_files(&self) -> Result<TrackedFileSet> {
        let output = self
            .command()
            .args(["ls-tree", "-r", "HEAD", "--name-only"])
            .output()
            .map_err(|e| ActivityError::startup_tool(format!("Failed to run git ls-tree: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(ActivityError::startup_tool(format!(
                "git ls-tree failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tracked = parse_tree_listing(&stdout);
        debug!(files = tracked.len(), dir = %self.dir.display(), "tracked files listed");
        Ok(tracked)
    }
}

/// Parse newline-separated paths, ignoring the trailing line terminator.
pub fn parse_tree_listing(listing: &str) -> TrackedFileSet {
    let body = listing
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(listing);

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn listing_with_trailing_newline() {
        let set = parse_tree_listing("a.txt\nsrc/b.rs\nc.txt\n");
        assert_eq!(set.len(), 3);
        assert!(set.contains("a.txt"));
        assert!(set.contains("src/b.rs"));
        assert!(set.contains("c.txt"));
        assert!(!set.contains(""));
    }

    #[test]
    fn listing_without_trailing_newline() {
        let set = parse_tree_listing("a.txt\nb.txt");
        assert_eq!(set.len(), 2);
        assert!(set.contains("b.txt"));
    }

    #[test]
    fn empty_listing_is_empty_set() {
        assert!(parse_tree_listing("").is_empty());
        assert!(parse_tree_listing("\n").is_empty());
    }

    #[test]
    fn paths_keep_inner_spaces() {
        let set = parse_tree_listing("docs/read me.md\r\n");
        assert!(set.contains("docs/read me.md"));
    }

    #[test]
    fn missing_git_binary_is_startup_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = GitRepo::at(dir.path()).with_program("/nonexistent/git-activity-test-git");
        let err = repo.tracked_files().unwrap_err();
        let ae = err.downcast_ref::<ActivityError>().unwrap();
        assert_eq!(ae.code, ErrorCode::StartupToolFailure);
    }
}
