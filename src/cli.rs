use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "git-activity",
    version,
    about = "Infer which files change together from git history and emit a Graphviz graph",
    after_help = "Run inside a git repository, e.g.\n  git-activity | dot -Tpdf -o graph.pdf"
)]
pub struct Cli {
    /// Minimum number of shared commits for an edge (default: 3)
    #[arg(
        long = "min_occurrence",
        visible_aliases = ["min_occurence", "min-occurrence"],
        value_name = "N"
    )]
    pub min_occurrence: Option<u32>,

    /// Pen width of the most frequent pair (default: 10)
    #[arg(long = "max_width", visible_alias = "max-width", value_name = "N")]
    pub max_width: Option<u32>,

    /// Only read this many of the most recent commits
    #[arg(long = "max_count", visible_alias = "max-count", value_name = "N")]
    pub max_count: Option<usize>,

    /// Emit the graph as JSON instead of Graphviz
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output (default: compact)
    #[arg(long, requires = "json")]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a default configuration file and exit
    /// (default: ~/.config/git-activity/config.toml)
    #[arg(long, value_name = "PATH")]
    pub init_config: Option<Option<PathBuf>>,
}
