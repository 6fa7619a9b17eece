//! Search pipeline
//!
//! query -> keywords -> per-feed listings (cached or fetched, concurrently)
//! -> concatenate in feed order -> dedupe by link -> rank -> truncate.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::cache::{dedupe_by_link, CacheManager, FeedCache};
use crate::config::Config;
use crate::data::{FeedFetcher, HttpFeedFetcher, JobListing, SearchResponse};
use crate::keywords::KeywordExtractor;
use crate::ranking;

pub use crate::ranking::DEFAULT_LIMIT;

/// Entry point for keyword searches over a fixed, ordered feed list
#[derive(Clone)]
pub struct JobSearch {
    feeds: Vec<String>,
    cache: FeedCache,
    extractor: KeywordExtractor,
}

impl JobSearch {
    /// Creates a search over `feeds`, served through `cache`
    pub fn new(feeds: Vec<String>, cache: FeedCache) -> Self {
        Self {
            feeds,
            cache,
            extractor: KeywordExtractor::new(),
        }
    }

    /// Builds the production pipeline: HTTP fetcher behind the disk cache
    pub fn from_config(config: &Config) -> Self {
        let fetcher: Arc<dyn FeedFetcher> =
            Arc::new(HttpFeedFetcher::new().with_timeout(config.fetch_timeout));
        let manager = config.cache_dir.clone().map(CacheManager::with_dir);
        let cache = FeedCache::new(manager, fetcher).with_ttl(config.cache_ttl);
        let extractor = if config.stemming {
            KeywordExtractor::new()
        } else {
            KeywordExtractor::without_stemming()
        };
        Self::new(config.feeds.clone(), cache).with_extractor(extractor)
    }

    /// Replaces the keyword extractor
    pub fn with_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Configured feeds, in priority order
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// The feed cache shared with the scheduler
    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Searches all feeds for `query`, returning at most `limit` listings
    ///
    /// Never fails: unavailable feeds contribute nothing, and a query without
    /// usable keywords returns an empty response.
    pub async fn search(&self, query: &str, limit: usize) -> SearchResponse {
        let keywords = self.extractor.extract(query);
        if keywords.is_empty() {
            debug!(query, "no keywords extracted, returning no results");
            return SearchResponse::empty(query);
        }

        let jobs = dedupe_by_link(self.collect_listings().await);
        let candidates = jobs.len();
        let ranked = ranking::rank(jobs, &keywords, limit);

        info!(
            query,
            keywords = ?keywords,
            candidates,
            returned = ranked.len(),
            "search complete"
        );
        SearchResponse::new(query, ranked)
    }

    /// Listings from every feed, concatenated in configured feed order
    async fn collect_listings(&self) -> Vec<JobListing> {
        let per_feed = join_all(self.feeds.iter().map(|url| self.cache.get(url))).await;
        per_feed.into_iter().flatten().collect()
    }
}
