//! octofeed - summarize a GitHub user's recent public activity.
//!
//! ```text
//! octofeed <username> [--json] [--raw] [--no-cache]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, debug};

use octofeed::cache::{FileCache, MemoryCache, ValidatorCache};
use octofeed::config::{Config, DEFAULT_API_BASE, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT};
use octofeed::feed::{ConditionalFetcher, aggregate};
use octofeed::github::GitHubClient;
use octofeed::{render, telemetry};

#[derive(Parser)]
#[command(name = "octofeed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize a GitHub user's recent public activity", long_about = None)]
struct Cli {
    /// GitHub username
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    username: String,

    /// Print the aggregated report as JSON
    #[arg(long, conflicts_with = "raw")]
    json: bool,

    /// Print one line per event instead of the aggregated report
    #[arg(long)]
    raw: bool,

    /// Skip the on-disk cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Directory for cached event records
    #[arg(long, env = "OCTOFEED_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "OCTOFEED_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Number of events to request (1-100)
    #[arg(long, env = "OCTOFEED_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Request timeout in seconds
    #[arg(long, env = "OCTOFEED_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn config(&self) -> octofeed::Result<Config> {
        Config {
            api_base: self.api_base.clone(),
            per_page: self.per_page,
            timeout: Duration::from_secs(self.timeout_secs),
            cache_dir: self.cache_dir.clone(),
            ..Config::default()
        }
        .validate()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    telemetry::init_tracing(cli.log_json, level);

    let config = cli.config()?;
    let client = GitHubClient::new(&config).context("failed to build HTTP client")?;
    let cache = open_cache(&cli, &config);

    let mut fetcher = ConditionalFetcher::new(client, cache);
    let outcome = fetcher.fetch(&cli.username).await;
    debug!(rate_limit = ?fetcher.source().rate_limit(), "fetch complete");

    if outcome.is_not_found() {
        eprintln!("{}", render::not_found_message(&cli.username));
        return Ok(ExitCode::FAILURE);
    }
    if let Some(reason) = outcome.error() {
        eprintln!("{}", render::stale_notice(&reason.to_string()));
    }

    let events = outcome.events();
    if cli.raw {
        print!("{}", render::render_raw(&cli.username, events));
    } else if cli.json {
        let report = aggregate(events);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&cli.username, &aggregate(events)));
    }

    Ok(ExitCode::SUCCESS)
}

/// Pick the cache backend; an unknown cache location degrades to memory.
fn open_cache(cli: &Cli, config: &Config) -> Box<dyn ValidatorCache> {
    if cli.no_cache {
        return Box::new(MemoryCache::new());
    }

    match config.resolved_cache_dir() {
        Some(dir) => {
            debug!(dir = %dir.display(), "using file cache");
            Box::new(FileCache::new(dir))
        }
        None => {
            tracing::warn!("no cache directory available, caching disabled");
            Box::new(MemoryCache::new())
        }
    }
}
