//! Feed caching and deduplication
//!
//! `CacheManager` persists one JSON file per feed URL. `FeedCache` layers the
//! TTL policy on top of it: fresh entries are served from disk, stale or
//! missing ones are fetched and written through, and failures degrade to an
//! empty listing for that feed. `dedupe_by_link` merges listings across feeds.

mod dedup;
mod feed_cache;
mod manager;

pub use dedup::dedupe_by_link;
pub use feed_cache::{FeedCache, DEFAULT_TTL_HOURS};
pub use manager::{CacheManager, CacheStats, FeedCacheEntry};
