//! Nepali Harvest main entry point
//!
//! This is the command-line interface for the Nepali Harvest corpus crawler.

use anyhow::Context;
use clap::Parser;
use nepali_harvest::config::{load_config_with_hash, validate, Config};
use nepali_harvest::crawler::{self, install_signal_handlers, InterruptFlag, RunOptions};
use nepali_harvest::output::{print_report, print_statistics, StateStatistics};
use nepali_harvest::storage::load_state;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Nepali Harvest: a resumable Nepali text corpus crawler
///
/// Nepali Harvest crawls news sites breadth-first, keeps the paragraphs
/// written in Nepali and saves each qualifying page as a numbered text file.
/// Interrupt it with Ctrl-C at any time and continue later with --resume.
#[derive(Parser, Debug)]
#[command(name = "nepali-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable Nepali text corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Continue from the saved state file instead of starting from the seeds
    #[arg(long)]
    resume: bool,

    /// State file to read and write (overrides output.state-file)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Stop after this many saved pages (overrides crawler.max-pages)
    #[arg(long, value_name = "N")]
    max_pages: Option<u64>,

    /// Maximum link depth from a seed (overrides crawler.max-depth)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the state file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_cli_config(&cli)?;

    let verbosity = if config.crawler.verbose {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    setup_logging(verbosity, cli.quiet);

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::info!("No configuration file given, using built-in defaults"),
    }

    let options = RunOptions {
        resume: cli.resume,
        state_file: cli.state_file.clone(),
        config_hash,
    };

    if cli.dry_run {
        handle_dry_run(&config, &options)
    } else if cli.stats {
        handle_stats(&config, &options)
    } else {
        handle_crawl(&config, options).await
    }
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_cli_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
        if config.crawler.max_crawled < max_pages {
            config.crawler.max_crawled = max_pages;
        }
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if cli.verbose > 0 {
        config.crawler.verbose = true;
    }

    validate(&config).context("Invalid command-line override")?;

    Ok((config, hash))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("nepali_harvest=info,warn"),
            1 => EnvFilter::new("nepali_harvest=debug,info"),
            2 => EnvFilter::new("nepali_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, options: &RunOptions) -> anyhow::Result<()> {
    let seeds = crawler::seed_urls(config)?;

    println!("=== Nepali Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max crawled: {}", config.crawler.max_crawled);
    println!(
        "  Checkpoint interval: {} pages",
        config.crawler.checkpoint_interval
    );
    println!(
        "  Minimum time between requests: {}ms",
        config.crawler.minimum_time_between_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Corpus directory: {}", config.output.corpus_dir);
    println!("  State file: {}", options.state_path(config).display());

    println!("\nExtractor:");
    println!("  Minimum lines: {}", config.extractor.min_lines);
    println!(
        "  Language check: {}",
        if config.extractor.require_nepali {
            "Nepali"
        } else {
            "Devanagari script"
        }
    );

    println!("\nSites ({}):", config.sites.len());
    for (site, seed) in config.sites.iter().zip(&seeds) {
        println!(
            "  - {} (domain: {})",
            seed,
            site.domain.as_deref().unwrap_or("seed host")
        );
        for pattern in &site.url_patterns {
            println!("    * {}", pattern);
        }
    }

    println!("\nExcluded Domains ({}):", config.exclude.len());
    for entry in &config.exclude {
        println!("  - {}", entry.domain);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the state file
fn handle_stats(config: &Config, options: &RunOptions) -> anyhow::Result<()> {
    let path = options.state_path(config);
    let persisted = load_state(&path, config.crawler.max_depth)
        .with_context(|| format!("Cannot show statistics for {}", path.display()))?;

    print_statistics(&path, &StateStatistics::from_persisted(&persisted));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, options: RunOptions) -> anyhow::Result<()> {
    if options.resume {
        tracing::info!("Resuming crawl from {}", options.state_path(config).display());
    } else {
        tracing::info!("Starting fresh crawl");
    }

    tracing::info!(
        "Sites: {}, Excluded: {}, Max pages: {}, Max depth: {}",
        config.sites.len(),
        config.exclude.len(),
        config.crawler.max_pages,
        config.crawler.max_depth
    );

    let interrupt = InterruptFlag::new();
    let signals = install_signal_handlers(interrupt.clone());

    let result = crawler::run(config, options, interrupt).await;
    signals.abort();

    match result {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
