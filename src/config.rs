//! Configuration loading and generation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::render::{DEFAULT_MAX_WIDTH, DEFAULT_MIN_OCCURRENCE};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Minimum number of shared commits for an edge to be drawn
    pub min_occurrence: u32,

    /// Pen width of the heaviest edge
    pub max_width: u32,

    /// Only read this many recent commits
    pub max_count: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            min_occurrence: DEFAULT_MIN_OCCURRENCE,
            max_width: DEFAULT_MAX_WIDTH,
            max_count: None,
        }
    }
}

/// Default log path: ~/.config/git-activity/logs
fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("git-activity")
        .join("logs")
}

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("git-activity")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            let mut config = Config::default();
            if let Some(dir) = config_dir {
                config.log_path = dir.join("logs");
            }
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // log_path left unset follows the config file
        if config.log_path == default_log_path()
            && let Some(dir) = config_dir
        {
            config.log_path = dir.join("logs");
        }

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        format!(
            r#"# git-activity configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: ~/.config/git-activity/logs)
# log_path = "~/.config/git-activity/logs"

# Minimum number of commits two files must share to be drawn (default: {DEFAULT_MIN_OCCURRENCE})
min_occurrence = {DEFAULT_MIN_OCCURRENCE}

# Pen width given to the most frequent pair (default: {DEFAULT_MAX_WIDTH})
max_width = {DEFAULT_MAX_WIDTH}

# Only read this many of the most recent commits (default: whole history)
# max_count = 1000
"#
        )
    }
}
