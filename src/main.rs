use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use git_activity::cli::Cli;
use git_activity::config::{Config, ConfigService};
use git_activity::engine::render::RenderOptions;
use git_activity::error::ActivityError;
use git_activity::service::{ActivityService, AnalyzeParams};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let (code, message) = classify_error(&e);
        let error = serde_json::json!({
            "error": { "code": code, "message": message }
        });
        // Stdout is reserved for the graph
        eprintln!("{error}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify_error(e: &anyhow::Error) -> (String, String) {
    if let Some(ae) = e.downcast_ref::<ActivityError>() {
        (ae.code.to_string(), ae.message.clone())
    } else {
        ("IO_ERROR".to_string(), format!("{e:#}"))
    }
}

/// Flags win over the config file, which wins over built-in defaults.
fn analyze_params(cli: &Cli, config: &Config) -> AnalyzeParams {
    AnalyzeParams {
        render: RenderOptions {
            min_occurrence: cli.min_occurrence.unwrap_or(config.min_occurrence),
            max_width: cli.max_width.unwrap_or(config.max_width),
        },
        max_count: cli.max_count.or(config.max_count),
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    if let Some(target) = &cli.init_config {
        let config_path = match target {
            Some(p) => {
                ConfigService::generate_at(p)?;
                p.clone()
            }
            None => {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            }
        };
        eprintln!("Configuration file created at: {}", config_path.display());
        return Ok(());
    }

    let config = ConfigService::load(cli.config.as_deref())?;

    let _log_guard = if cli.debug || config.debug {
        Some(git_activity::logger::init(&config)?)
    } else {
        None
    };

    let params = analyze_params(&cli, &config);
    let graph = ActivityService::new().analyze(&params)?;

    // Rendered in full before anything reaches stdout, so a failed run
    // never leaves a truncated graph behind.
    let output = if cli.json {
        let mut s = if cli.pretty {
            serde_json::to_string_pretty(&graph)?
        } else {
            serde_json::to_string(&graph)?
        };
        s.push('\n');
        s
    } else {
        graph.to_dot()
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write graph to stdout")?;
    stdout.flush()?;
    Ok(())
}
