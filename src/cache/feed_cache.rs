//! TTL-aware feed cache
//!
//! Wraps a `FeedFetcher` with the on-disk `CacheManager`: fresh entries are
//! served from disk, stale or missing ones are fetched and written through.
//! Failures never escape `get`; an unavailable feed contributes no listings.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::{CacheManager, FeedCacheEntry};
use crate::data::{FeedFetcher, FetchError, JobListing};

/// Default cache TTL in hours
pub const DEFAULT_TTL_HOURS: i64 = 4;

/// Per-feed cache in front of a fetcher
#[derive(Clone)]
pub struct FeedCache {
    cache: Option<CacheManager>,
    fetcher: Arc<dyn FeedFetcher>,
    ttl: Duration,
}

impl FeedCache {
    /// Creates a FeedCache with the default TTL
    ///
    /// With `cache` set to `None` every lookup goes to the fetcher.
    pub fn new(cache: Option<CacheManager>, fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Overrides the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The underlying disk cache, if any
    pub fn manager(&self) -> Option<&CacheManager> {
        self.cache.as_ref()
    }

    /// Listings for a feed, from cache when fresh, otherwise fetched
    pub async fn get(&self, feed_url: &str) -> Vec<JobListing> {
        self.get_at(feed_url, Utc::now()).await
    }

    /// Same as `get`, evaluating freshness against `now`
    pub async fn get_at(&self, feed_url: &str, now: DateTime<Utc>) -> Vec<JobListing> {
        if let Some(entry) = self.cache.as_ref().and_then(|c| c.read(feed_url)) {
            if self.is_fresh(&entry, now) {
                debug!(feed_url, jobs = entry.jobs.len(), "serving feed from cache");
                return entry.jobs;
            }
            debug!(feed_url, "cached feed expired");
        }

        match self.fetch_and_store(feed_url, now).await {
            Ok(jobs) => jobs,
            Err(error) => {
                warn!(feed_url, %error, "feed fetch failed, contributing no listings");
                Vec::new()
            }
        }
    }

    /// Fetches a feed regardless of cache age and writes it through
    ///
    /// Returns the number of listings fetched.
    pub async fn refresh(&self, feed_url: &str) -> Result<usize, FetchError> {
        let jobs = self.fetch_and_store(feed_url, Utc::now()).await?;
        Ok(jobs.len())
    }

    /// Entries stamped in the future are stale, not fresh forever
    fn is_fresh(&self, entry: &FeedCacheEntry, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(entry.fetched_at());
        age >= Duration::zero() && age <= self.ttl
    }

    async fn fetch_and_store(
        &self,
        feed_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<JobListing>, FetchError> {
        let jobs = self.fetcher.fetch(feed_url).await?;

        if let Some(ref cache) = self.cache {
            if let Err(error) = cache.write(feed_url, &jobs, now) {
                warn!(feed_url, %error, "failed to write feed cache");
            }
        }

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const FEED: &str = "https://jobs.example.com/feed.rss";

    /// Fetcher that counts calls and either returns one listing or fails
    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedFetcher for CountingFetcher {
        async fn fetch(&self, feed_url: &str) -> Result<Vec<JobListing>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Status(503));
            }
            Ok(vec![JobListing {
                title: "Fresh Listing".to_string(),
                link: "https://jobs.example.com/fresh".to_string(),
                description: String::new(),
                pub_date: None,
                source: feed_url.to_string(),
            }])
        }
    }

    fn stale_jobs() -> Vec<JobListing> {
        vec![JobListing {
            title: "Cached Listing".to_string(),
            link: "https://jobs.example.com/cached".to_string(),
            description: String::new(),
            pub_date: None,
            source: FEED.to_string(),
        }]
    }

    fn setup(fail: bool) -> (FeedCache, Arc<CountingFetcher>, CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let manager = CacheManager::with_dir(temp_dir.path().to_path_buf());
        let fetcher = CountingFetcher::new(fail);
        let cache = FeedCache::new(Some(manager.clone()), fetcher.clone());
        (cache, fetcher, manager, temp_dir)
    }

    #[tokio::test]
    async fn test_entry_within_ttl_is_served_without_fetch() {
        let (cache, fetcher, manager, _dir) = setup(false);
        let written_at = Utc::now();
        manager.write(FEED, &stale_jobs(), written_at).unwrap();

        let now = written_at + Duration::hours(3) + Duration::minutes(59);
        let jobs = cache.get_at(FEED, now).await;

        assert_eq!(jobs, stale_jobs());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_entry_past_ttl_triggers_refetch() {
        let (cache, fetcher, manager, _dir) = setup(false);
        let written_at = Utc::now() - Duration::hours(5);
        manager.write(FEED, &stale_jobs(), written_at).unwrap();

        let now = written_at + Duration::hours(4) + Duration::minutes(1);
        let jobs = cache.get_at(FEED, now).await;

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(jobs[0].title, "Fresh Listing");

        let entry = manager.read(FEED).unwrap();
        assert_eq!(entry.timestamp, now.timestamp_millis());
        assert_eq!(entry.jobs, jobs);
    }

    #[tokio::test]
    async fn test_future_timestamp_is_treated_as_stale() {
        let (cache, fetcher, manager, _dir) = setup(false);
        let now = Utc::now();
        manager
            .write(FEED, &stale_jobs(), now + Duration::hours(1))
            .unwrap();

        let jobs = cache.get_at(FEED, now).await;

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(jobs[0].title, "Fresh Listing");
        assert_eq!(manager.read(FEED).unwrap().timestamp, now.timestamp_millis());
    }

    #[tokio::test]
    async fn test_miss_fetches_and_writes_through() {
        let (cache, fetcher, manager, _dir) = setup(false);

        let first = cache.get(FEED).await;
        let second = cache.get(FEED).await;

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(first, second);
        assert!(manager.read(FEED).is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_list() {
        let (cache, fetcher, manager, _dir) = setup(true);

        let jobs = cache.get(FEED).await;

        assert!(jobs.is_empty());
        assert_eq!(fetcher.calls(), 1);
        assert!(manager.read(FEED).is_none());
    }

    #[tokio::test]
    async fn test_stale_entry_not_served_when_fetch_fails() {
        let (cache, _fetcher, manager, _dir) = setup(true);
        manager
            .write(FEED, &stale_jobs(), Utc::now() - Duration::hours(5))
            .unwrap();

        assert!(cache.get(FEED).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_still_returns_fetched_data() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let fetcher = CountingFetcher::new(false);
        let cache = FeedCache::new(Some(CacheManager::with_dir(blocker)), fetcher.clone());

        let jobs = cache.get(FEED).await;

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Fresh Listing");
    }

    #[tokio::test]
    async fn test_refresh_ignores_ttl() {
        let (cache, fetcher, manager, _dir) = setup(false);
        manager.write(FEED, &stale_jobs(), Utc::now()).unwrap();

        let count = cache.refresh(FEED).await.expect("refresh should succeed");

        assert_eq!(count, 1);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(manager.read(FEED).unwrap().jobs[0].title, "Fresh Listing");
    }

    #[tokio::test]
    async fn test_refresh_reports_failure() {
        let (cache, _fetcher, _manager, _dir) = setup(true);
        assert!(matches!(cache.refresh(FEED).await, Err(FetchError::Status(503))));
    }

    #[tokio::test]
    async fn test_uncached_always_fetches() {
        let fetcher = CountingFetcher::new(false);
        let cache = FeedCache::new(None, fetcher.clone());

        cache.get(FEED).await;
        cache.get(FEED).await;

        assert_eq!(fetcher.calls(), 2);
        assert!(cache.manager().is_none());
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let (cache, fetcher, manager, _dir) = setup(false);
        let cache = cache.with_ttl(Duration::minutes(10));
        let written_at = Utc::now();
        manager.write(FEED, &stale_jobs(), written_at).unwrap();

        cache.get_at(FEED, written_at + Duration::minutes(11)).await;

        assert_eq!(fetcher.calls(), 1);
    }
}
