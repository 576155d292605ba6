//! doc-mirror main entry point
//!
//! This is the command-line interface for mirroring a documentation site.

use anyhow::Context;
use clap::Parser;
use doc_mirror::config::{load_config, Config, OutputFormat};
use doc_mirror::output::print_report;
use doc_mirror::Coordinator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// doc-mirror: an offline mirror for documentation sites
///
/// doc-mirror walks every page and asset reachable on one host, breadth-first,
/// and writes them into a local directory tree. HTML pages can optionally be
/// converted to Markdown.
#[derive(Parser, Debug)]
#[command(name = "doc-mirror")]
#[command(version)]
#[command(about = "Mirror a documentation site for offline use", long_about = None)]
struct Cli {
    /// Directory to write the mirror into [default: offline-docs]
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Root URL of the site to mirror [default: https://docs.aurora-wow.wtf/]
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Output format for HTML pages [default: html]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// File listing the paths (or URLs) to start from, one per line
    #[arg(long, value_name = "FILE")]
    paths_file: Option<PathBuf>,

    /// Only fetch the seeds and their assets; do not follow <a> links
    #[arg(long)]
    no_follow: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and list the seed URLs without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let mut coordinator = Coordinator::new(config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&coordinator);
        return Ok(());
    }

    let report = coordinator.run().await.context("Mirror failed")?;
    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_mirror=info,warn"),
            1 => EnvFilter::new("doc_mirror=debug,info"),
            2 => EnvFilter::new("doc_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration
///
/// Values come from the config file (if given), then command-line flags override them.
/// Anything still unset keeps its default.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.mirror.output_dir = output.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.mirror.base_url = base_url.clone();
    }
    if let Some(format) = cli.format {
        config.mirror.format = format;
    }
    if let Some(paths_file) = &cli.paths_file {
        config.mirror.paths_file = Some(paths_file.clone());
    }
    if cli.no_follow {
        config.mirror.follow_links = false;
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be mirrored
fn handle_dry_run(coordinator: &Coordinator) {
    println!("=== doc-mirror Dry Run ===\n");

    println!("Base URL: {}", coordinator.root());
    println!("Authority: {}", coordinator.authority());

    let seeds = coordinator.queued_urls();
    println!("\nSeed URLs ({}):", seeds.len());
    for url in &seeds {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}
