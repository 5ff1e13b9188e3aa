//! Krio-Fetch main entry point
//!
//! This is the command-line interface for fetching web pages as plain-text
//! documents, one at a time or in concurrent batches.

use anyhow::{bail, Context};
use clap::Parser;
use krio_fetch::config::{load_config, validate, Config};
use krio_fetch::fetcher::{BatchFetcher, Document};
use krio_fetch::input::load_url_list;
use krio_fetch::output::{print_statistics, write_markdown_report, BatchStatistics};
use krio_fetch::url::UrlGuard;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Krio-Fetch: guarded, cached, concurrent page fetching
///
/// Fetches web pages, strips navigation and scripts, and prints the
/// extracted text. Private and loopback addresses are refused.
#[derive(Parser, Debug)]
#[command(name = "krio-fetch")]
#[command(version)]
#[command(about = "Fetch web pages as plain-text documents", long_about = None)]
struct Cli {
    /// URLs to fetch
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// Read additional URLs from a .txt or .md file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the maximum number of concurrent fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Disable the document cache
    #[arg(long)]
    no_cache: bool,

    /// Validate config and URLs without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Write a markdown report of the batch to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Print the extracted text of each document
    #[arg(long)]
    show_content: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let urls = collect_urls(&cli)?;

    if urls.is_empty() {
        bail!("No URLs given; pass them as arguments or use --file");
    }

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    let fetcher = BatchFetcher::from_config(&config).context("Failed to build HTTP client")?;

    if urls.len() == 1 && cli.file.is_none() && cli.report.is_none() {
        handle_single(&fetcher, &urls[0], cli.show_content).await
    } else {
        handle_batch(&fetcher, &urls, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("krio_fetch=info,warn"),
            1 => EnvFilter::new("krio_fetch=debug,info"),
            2 => EnvFilter::new("krio_fetch=trace,debug"),
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

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.no_cache {
        config.cache.enabled = false;
    }

    if let Some(concurrency) = cli.concurrency {
        config.batch.max_concurrency = concurrency;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Gathers URLs from positional arguments followed by the URL list file
fn collect_urls(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.file {
        let listed = load_url_list(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        tracing::info!("Loaded {} URLs from {}", listed.len(), path.display());
        urls.extend(listed);
    }

    Ok(urls)
}

/// Handles the --dry-run mode: shows the config and checks every URL
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Krio-Fetch Dry Run ===\n");

    println!("Fetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout per attempt: {}s", config.fetcher.timeout_secs);
    println!("  Max retries: {}", config.fetcher.max_retries);
    println!("  Retry delay: {}ms", config.fetcher.retry_delay_ms);
    if !config.fetcher.trusted_hosts.is_empty() {
        println!("  Trusted hosts: {}", config.fetcher.trusted_hosts.join(", "));
    }

    println!("\nCache:");
    println!("  Enabled: {}", config.cache.enabled);
    println!("  TTL: {}s", config.cache.ttl_secs);

    println!("\nBatch:");
    println!("  Max concurrency: {}", config.batch.max_concurrency);

    let guard = UrlGuard::with_trusted_hosts(config.fetcher.trusted_hosts.iter().cloned());
    let mut rejected = 0;

    println!("\nURLs ({}):", urls.len());
    for url in urls {
        match guard.validate(url) {
            Ok(_) => println!("  ✓ {}", url),
            Err(e) => {
                rejected += 1;
                println!("  ✗ {} ({})", url, e);
            }
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch {} URLs ({} rejected by validation)",
        urls.len() - rejected,
        rejected
    );
}

/// Fetches one URL and prints the document
async fn handle_single(
    fetcher: &BatchFetcher,
    url: &str,
    show_content: bool,
) -> anyhow::Result<()> {
    tracing::info!("Fetching {}", url);

    match fetcher.fetch_one(url).await {
        Ok(document) => {
            print_document(&document, show_content);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Fetch failed: {}", e);
            Err(e.into())
        }
    }
}

/// Fetches every URL concurrently; Ctrl-C cancels URLs not yet started
async fn handle_batch(fetcher: &BatchFetcher, urls: &[String], cli: &Cli) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling URLs not yet started");
            trigger.cancel();
        }
    });

    let result = fetcher
        .fetch_batch(urls, cancel, fetcher.max_concurrency())
        .await;

    if !cli.quiet {
        for document in result.iter().filter_map(|o| o.document()) {
            print_document(document, cli.show_content);
        }

        let stats = BatchStatistics::from_result(&result);
        print_statistics(&stats, fetcher.cache_size());
    }

    if let Some(path) = &cli.report {
        write_markdown_report(&result, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_document(document: &Document, show_content: bool) {
    let title = if document.title.is_empty() {
        "(untitled)"
    } else {
        document.title.as_str()
    };

    println!("{}", "=".repeat(80));
    println!("Title: {}", title);
    println!("URL: {}", document.url);
    println!("Length: {} chars", document.content.chars().count());

    if show_content {
        println!("{}", "-".repeat(80));
        println!("{}", document.content);
    }
    println!();
}
