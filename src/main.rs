//! Career-Scout main entry point
//!
//! This is the command-line interface for the career page locator.

use anyhow::Context;
use career_scout::config::{load_config_with_hash, Config};
use career_scout::crawler::{run_crawl, Coordinator};
use career_scout::normalize_company_url;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Career-Scout: finds the job listing page of every known company
///
/// Career-Scout locates each company's careers page, asks a classifier
/// whether it lists open positions, and follows the classifier's
/// suggestions until it finds one. Results persist across runs, so only
/// companies still lacking a live target page are revisited.
#[derive(Parser, Debug)]
#[command(name = "career-scout")]
#[command(version)]
#[command(about = "Locates and classifies company career pages", long_about = None)]
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

    /// Validate config and show what would be crawled without touching the network
    #[arg(long, conflicts_with_all = ["stats", "export_summary", "rot_check_only"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary", "rot_check_only"])]
    stats: bool,

    /// Write the markdown list of target pages and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "rot_check_only"])]
    export_summary: bool,

    /// Re-probe known target pages, drop dead ones, and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    rot_check_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Secrets such as the classifier API key may live in .env
    dotenvy::dotenv().ok();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else if cli.rot_check_only {
        handle_rot_check(config, config_hash).await?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("career_scout=info,warn"),
            1 => EnvFilter::new("career_scout=debug,info"),
            2 => EnvFilter::new("career_scout=trace,debug"),
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

/// Handles the --dry-run mode: prints settings, seeds and locator tables
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Career-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Probe timeout: {}ms", config.crawler.probe_timeout_ms);
    println!("  Page timeout: {}ms", config.crawler.page_timeout_ms);
    println!(
        "  Network idle settle: {}ms",
        config.crawler.network_idle_settle_ms
    );
    println!(
        "  Sitemap: {} (verify up to {})",
        if config.crawler.sitemap_enabled { "enabled" } else { "disabled" },
        config.crawler.sitemap_verify_limit
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);
    if let Some(dir) = &config.output.results_dir {
        println!("  Classification archive: {}", dir);
    }

    if let Some(classifier) = &config.classifier {
        println!("\nClassifier:");
        println!("  Endpoint: {}", classifier.endpoint);
        println!("  Model: {}", classifier.model);
        println!(
            "  API key variable: {} ({})",
            classifier.api_key_env,
            if std::env::var(&classifier.api_key_env).is_ok() { "set" } else { "not set" }
        );
        println!("  Min interval: {}ms", classifier.min_interval_ms);
    }

    let tables = &config.locator;
    println!("\nLocator Tables:");
    println!("  Career paths ({}): {}", tables.career_paths.len(), tables.career_paths.join(", "));
    println!("  URL fragments ({}): {}", tables.url_fragments.len(), tables.url_fragments.join(", "));
    println!("  Link keywords ({}): {}", tables.keywords.len(), tables.keywords.join(", "));
    println!(
        "  Sitemap keywords ({}): {}",
        tables.sitemap_keywords.len(),
        tables.sitemap_keywords.join(", ")
    );

    println!("\nCompanies ({}):", config.companies.len());
    for entry in &config.companies {
        let url = normalize_company_url(&entry.url)
            .with_context(|| format!("invalid URL for company {}", entry.name))?;
        println!("  - {} -> {}", entry.name, url);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would seed {} companies and explore up to depth {}",
        config.companies.len(),
        config.crawler.max_depth
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use career_scout::output::{load_statistics, print_statistics};
    use career_scout::storage::open_storage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: writes the markdown target list
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    use career_scout::output::{generate_markdown_summary, generate_summary};
    use career_scout::storage::open_storage;
    use std::path::Path;

    println!("=== Exporting Target Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_storage(Path::new(&config.output.database_path))?;

    tracing::info!("Loading targets from database...");
    let summary = generate_summary(&storage)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!(
        "✓ {} target pages for {} of {} companies exported to: {}",
        summary.total_targets(),
        summary.companies_with_target,
        summary.total_companies,
        config.output.summary_path
    );

    Ok(())
}

/// Handles the --rot-check-only mode
async fn handle_rot_check(config: Config, config_hash: String) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.seed_companies()?;

    let rotted = coordinator.check_rot().await?;
    if rotted.is_empty() {
        println!("✓ All target pages are alive");
    } else {
        println!(
            "✗ {} target pages rotted; their companies will be re-queued on the next crawl",
            rotted.len()
        );
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        companies = config.companies.len(),
        max_depth = config.crawler.max_depth,
        "Starting crawl"
    );

    match run_crawl(config, config_hash).await {
        Ok(counters) => {
            tracing::info!(
                processed = counters.companies_processed,
                targets = counters.targets_found,
                exhausted = counters.companies_exhausted,
                failed = counters.companies_failed,
                rotted = counters.targets_rotted,
                "Crawl completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
