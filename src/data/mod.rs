//! Core data models for jobfeed
//!
//! This module contains the job listing type shared by the fetcher, the
//! cache, the ranker and the search pipeline, plus the feed client that
//! produces listings.

pub mod feed;

pub use feed::{FeedFetcher, FetchError, HttpFeedFetcher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// A single job posting taken from a feed item
///
/// Listings are produced once by the fetcher and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Title of the posting
    pub title: String,
    /// Canonical URL of the posting, used as the dedup key
    pub link: String,
    /// Plain-text description, bounded to `MAX_DESCRIPTION_CHARS`
    pub description: String,
    /// Publication date, if the feed provided a parseable one
    pub pub_date: Option<DateTime<Utc>>,
    /// URL of the feed this listing came from
    pub source: String,
}

impl JobListing {
    /// Key used for cross-feed deduplication (trimmed, case-insensitive link)
    pub fn dedup_key(&self) -> String {
        self.link.trim().to_lowercase()
    }
}

/// Result of a search over all configured feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ranked listings, at most `limit` of them
    pub jobs: Vec<JobListing>,
    /// Number of listings in `jobs`
    pub total: usize,
    /// The query as given by the caller
    pub query: String,
}

impl SearchResponse {
    /// Builds a response, deriving `total` from the job list
    pub fn new(query: impl Into<String>, jobs: Vec<JobListing>) -> Self {
        Self {
            total: jobs.len(),
            jobs,
            query: query.into(),
        }
    }

    /// A response with no jobs
    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }
}
