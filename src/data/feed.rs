//! RSS feed client
//!
//! Fetches a feed over HTTP with a bounded timeout and turns its items into
//! `JobListing`s. Items that lack a title or link are skipped rather than
//! failing the whole feed.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use rss::Channel;
use thiserror::Error;
use tracing::debug;

use super::{JobListing, MAX_DESCRIPTION_CHARS};

/// Default timeout for a single feed request
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = concat!("jobfeed/", env!("CARGO_PKG_VERSION"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Errors that can occur when fetching a feed
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or timed out
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Body was not a readable RSS document
    #[error("Failed to parse feed: {0}")]
    Parse(#[from] rss::Error),
}

/// Source of job listings for a feed URL
///
/// The feed cache talks to this trait so that it can be driven by the HTTP
/// client in production and by in-memory fixtures in tests.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<JobListing>, FetchError>;
}

/// Client for fetching RSS feeds over HTTP
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
    timeout: Duration,
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFeedFetcher {
    /// Create a new HttpFeedFetcher with the default timeout
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<JobListing>, FetchError> {
        let response = self
            .client
            .get(feed_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_feed(&body, feed_url)
    }
}

/// Parse an RSS document into job listings attributed to `source`
pub fn parse_feed(body: &[u8], source: &str) -> Result<Vec<JobListing>, FetchError> {
    let channel = Channel::read_from(body)?;

    let mut jobs = Vec::with_capacity(channel.items().len());
    for item in channel.items() {
        let title = item.title().map(str::trim).unwrap_or_default();
        let link = item
            .link()
            .or_else(|| item.guid().filter(|g| g.is_permalink()).map(|g| g.value()))
            .map(str::trim)
            .unwrap_or_default();

        if title.is_empty() || link.is_empty() {
            debug!(feed_url = source, "skipping feed item without title or link");
            continue;
        }

        let raw_description = item.description().or(item.content()).unwrap_or_default();

        jobs.push(JobListing {
            title: title.to_string(),
            link: link.to_string(),
            description: clean_description(raw_description),
            pub_date: item.pub_date().and_then(parse_pub_date),
            source: source.to_string(),
        });
    }

    Ok(jobs)
}

/// Parse an RSS publication date (RFC 2822, with RFC 3339 as a fallback)
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Strip markup, decode common entities, collapse whitespace and bound length
pub fn clean_description(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_DESCRIPTION_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
