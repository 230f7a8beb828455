//! Quote-Crawler main entry point
//!
//! This is the command-line interface for the Quote-Crawler dataset builder.

use anyhow::Context;
use clap::Parser;
use quote_crawler::analysis::{self, print_statistics, run_sentiment, run_statistics};
use quote_crawler::config::{load_config_with_hash, Config};
use quote_crawler::crawler::crawl;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Quote-Crawler: a polite paginated quote harvester
///
/// Quote-Crawler follows the next-page chain from a seed URL, extracts
/// every quote with its author and tags, and writes a CSV dataset. The
/// dataset can then be summarized or scored for sentiment.
#[derive(Parser, Debug)]
#[command(name = "quote-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite paginated quote harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "sentiment"])]
    dry_run: bool,

    /// Compute statistics over the existing dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "sentiment"])]
    stats: bool,

    /// Score the existing dataset for sentiment and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    sentiment: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("invalid configuration {}", cli.config.display()));
        }
    };

    let result = if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.sentiment {
        handle_sentiment(&config)
    } else {
        handle_crawl(&config).await
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_crawler=info,warn"),
            1 => EnvFilter::new("quote_crawler=debug,info"),
            2 => EnvFilter::new("quote_crawler=trace,debug"),
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
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Quote-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!(
        "  Politeness interval: {}ms",
        config.crawler.politeness_interval
    );
    match config.crawler.max_pages {
        Some(limit) => println!("  Max pages: {}", limit),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout, config.crawler.connect_timeout
    );

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: {}ms base, {}ms cap",
        config.retry.base_delay, config.retry.max_delay
    );

    println!("\nUser Agent:");
    println!(
        "  {}",
        quote_crawler::crawler::format_user_agent(&config.user_agent)
    );

    println!("\nSelectors:");
    println!("  Quote: {}", config.extractor.quote);
    println!("  Text: {}", config.extractor.text);
    println!("  Author: {}", config.extractor.author);
    println!("  Tag: {}", config.extractor.tag);
    println!("  Next: {}", config.extractor.next);
    println!("  Page marker: {}", config.extractor.page_marker);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Statistics: {}", config.output.stats_dir);
    println!("  Sentiment: {}", config.output.sentiment_dir);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling at {}",
        config.crawler.seed_url
    );

    Ok(())
}

/// Handles the --stats mode: summarizes the existing dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let dataset = Path::new(&config.output.dataset_path);
    let output_dir = Path::new(&config.output.stats_dir);

    println!("Dataset: {}\n", dataset.display());

    let stats = run_statistics(dataset, output_dir)
        .with_context(|| format!("statistics over {} failed", dataset.display()))?;

    print_statistics(&stats);
    println!("\n✓ Artifacts written to: {}", output_dir.display());

    Ok(())
}

/// Handles the --sentiment mode: scores the existing dataset
fn handle_sentiment(config: &Config) -> anyhow::Result<()> {
    let dataset = Path::new(&config.output.dataset_path);
    let output_dir = Path::new(&config.output.sentiment_dir);

    println!("Dataset: {}\n", dataset.display());

    let report = run_sentiment(dataset, output_dir)
        .with_context(|| format!("sentiment over {} failed", dataset.display()))?;

    analysis::sentiment::print_summary(&report);
    println!(
        "\n✓ {} quote(s) scored, results in: {}",
        report.total,
        output_dir.display()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl at {} (interval {}ms)",
        config.crawler.seed_url,
        config.crawler.politeness_interval
    );

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            interrupt.cancel();
        }
    });

    let report = crawl(config, cancel).await.context("crawl failed")?;

    tracing::info!(
        "Crawl completed successfully: {} quote(s) from {} page(s) in {}s",
        report.records_written,
        report.pages_visited,
        report.duration().num_seconds()
    );
    println!(
        "✓ Saved {} quote(s) to {}",
        report.records_written,
        report.destination.display()
    );

    Ok(())
}
