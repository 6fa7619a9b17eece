//! jobfeed library
//!
//! Aggregates job postings from RSS feeds and ranks them against a free-text
//! query. `JobSearch::search` is the pipeline entry point; `FeedScheduler`
//! keeps the feed cache warm in the background.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod keywords;
pub mod ranking;
pub mod scheduler;
pub mod search;

pub use cache::{dedupe_by_link, CacheManager, CacheStats, FeedCache};
pub use config::Config;
pub use data::{FeedFetcher, FetchError, HttpFeedFetcher, JobListing, SearchResponse};
pub use keywords::{extract_keywords, KeywordExtractor};
pub use scheduler::{FeedScheduler, RefreshSummary};
pub use search::JobSearch;
