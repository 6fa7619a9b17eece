//! Command-line interface parsing for jobfeed
//!
//! This module handles parsing of CLI arguments using clap: the search
//! command plus the scheduler and cache maintenance commands.

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::Config;
use crate::ranking::DEFAULT_LIMIT;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The feed URL is not an http(s) URL
    #[error("Invalid feed URL: '{0}'. Feed URLs must start with http:// or https://")]
    InvalidFeedUrl(String),
}

/// jobfeed - search job postings aggregated from RSS feeds
#[derive(Parser, Debug)]
#[command(name = "jobfeed")]
#[command(about = "Search and rank job postings from public RSS feeds")]
#[command(version)]
pub struct Cli {
    /// Feed URL to use instead of the configured list (repeatable, order matters)
    #[arg(long = "feed", value_name = "URL", global = true)]
    pub feeds: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search all feeds and print matching jobs as JSON
    ///
    /// Examples:
    ///   jobfeed search flutter developer
    ///   jobfeed search "senior rust backend" --limit 5
    Search {
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of jobs to return
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Refresh every feed once and print the summary
    Refresh,

    /// Keep refreshing feeds in the background until interrupted
    Watch {
        /// Minutes between refresh passes (defaults to the configured interval)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Print cache statistics as JSON
    Stats,

    /// Delete all cached feeds
    ClearCache,
}

impl Cli {
    /// The query words joined back into one string, for `search`
    pub fn query(&self) -> Option<String> {
        match &self.command {
            Command::Search { query, .. } => Some(query.join(" ")),
            _ => None,
        }
    }

    /// Applies command-line overrides to a loaded configuration
    ///
    /// # Returns
    /// * `Ok(Config)` with `--feed` values replacing the feed list, if any
    /// * `Err(CliError)` if a feed URL is not http(s)
    pub fn apply_to(&self, mut config: Config) -> Result<Config, CliError> {
        if !self.feeds.is_empty() {
            config.feeds = self
                .feeds
                .iter()
                .map(|f| parse_feed_arg(f))
                .collect::<Result<_, _>>()?;
        }
        Ok(config)
    }
}

/// Validates a `--feed` argument
///
/// # Returns
/// * `Ok(String)` with surrounding whitespace removed
/// * `Err(CliError::InvalidFeedUrl)` if the URL is not http(s)
pub fn parse_feed_arg(s: &str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(CliError::InvalidFeedUrl(s.to_string()))
    }
}
