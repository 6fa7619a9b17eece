//! Runtime configuration
//!
//! Defaults cover everything; `Config::from_env` overrides them from
//! environment variables (and a `.env` file, if present).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::{CacheManager, DEFAULT_TTL_HOURS};
use crate::data::feed::DEFAULT_FETCH_TIMEOUT;
use crate::scheduler::{DEFAULT_BATCH_SIZE, DEFAULT_REFRESH_INTERVAL};

/// Public job feeds queried when nothing else is configured
///
/// Order matters: when two feeds carry the same posting, the earlier feed's
/// copy is the one returned.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://weworkremotely.com/categories/remote-programming-jobs.rss",
    "https://weworkremotely.com/categories/remote-devops-sysadmin-jobs.rss",
    "https://weworkremotely.com/categories/remote-design-jobs.rss",
    "https://remoteok.com/remote-jobs.rss",
    "https://remotive.com/remote-jobs/feed/software-dev",
    "https://jobicy.com/?feed=job_feed",
    "https://www.workingnomads.com/jobsrss",
    "https://himalayas.app/jobs/rss",
];

/// Settings for the search pipeline and the refresh scheduler
#[derive(Debug, Clone)]
pub struct Config {
    /// Feed URLs in priority order
    pub feeds: Vec<String>,
    /// Where cache files live; `None` disables the disk cache
    pub cache_dir: Option<PathBuf>,
    /// Maximum age of a cached feed
    pub cache_ttl: chrono::Duration,
    /// Timeout for a single feed request
    pub fetch_timeout: Duration,
    /// Period of the background refresh
    pub refresh_interval: Duration,
    /// Feeds refreshed concurrently per batch
    pub batch_size: usize,
    /// Whether query keywords are stemmed
    pub stemming: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            cache_dir: CacheManager::new().map(|m| m.dir().to_path_buf()),
            cache_ttl: chrono::Duration::hours(DEFAULT_TTL_HOURS),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
            stemming: true,
        }
    }
}

impl Config {
    /// Loads configuration from `JOBFEED_*` environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut config = Config::default();

        if let Ok(feeds) = std::env::var("JOBFEED_FEEDS") {
            config.feeds = parse_feed_list(&feeds);
        }
        if let Ok(dir) = std::env::var("JOBFEED_CACHE_DIR") {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(hours) = parse_env::<i64>("JOBFEED_CACHE_TTL_HOURS")? {
            config.cache_ttl = ttl_from_hours(hours).context("invalid JOBFEED_CACHE_TTL_HOURS")?;
        }
        if let Some(secs) = parse_env::<u64>("JOBFEED_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(minutes) = parse_env::<u64>("JOBFEED_REFRESH_INTERVAL_MINUTES")? {
            config.refresh_interval = interval_from_minutes(minutes)
                .context("invalid JOBFEED_REFRESH_INTERVAL_MINUTES")?;
        }
        if let Some(size) = parse_env::<usize>("JOBFEED_BATCH_SIZE")? {
            anyhow::ensure!(size > 0, "JOBFEED_BATCH_SIZE must be at least 1");
            config.batch_size = size;
        }
        if let Some(stemming) = parse_env::<bool>("JOBFEED_STEMMING")? {
            config.stemming = stemming;
        }

        Ok(config)
    }
}

/// Cache TTL for a number of hours; negative or out-of-range values are errors
pub fn ttl_from_hours(hours: i64) -> Result<chrono::Duration> {
    anyhow::ensure!(hours >= 0, "cache TTL cannot be negative, got {hours} hours");
    chrono::Duration::try_hours(hours)
        .with_context(|| format!("cache TTL of {hours} hours is out of range"))
}

/// Refresh period for a number of minutes, rejecting values that overflow
pub fn interval_from_minutes(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .with_context(|| format!("refresh interval of {minutes} minutes is out of range"))
}

/// Splits a comma-separated feed list, dropping blanks
pub fn parse_feed_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value {value:?}")),
        Err(_) => Ok(None),
    }
}
