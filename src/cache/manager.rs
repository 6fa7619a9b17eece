//! Cache manager for persisting fetched feeds to disk
//!
//! Provides a `CacheManager` that stores one JSON file per feed URL, named by
//! the SHA-256 of the URL, together with the time the feed was fetched.

use chrono::{DateTime, TimeZone, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::data::JobListing;

/// Distinguishes temp files of concurrent writes within one process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// On-disk shape of a cached feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCacheEntry {
    /// URL of the feed this entry belongs to
    pub feed_url: String,
    /// When the feed was fetched, in epoch milliseconds
    pub timestamp: i64,
    /// Listings in feed order
    pub jobs: Vec<JobListing>,
}

impl FeedCacheEntry {
    /// When the feed was fetched
    pub fn fetched_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Summary of what is currently on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of cache files
    pub total_files: usize,
    /// Combined size of all cache files in bytes
    pub total_size: u64,
    /// Fetch time of the oldest entry
    pub oldest_file: Option<DateTime<Utc>>,
    /// Fetch time of the newest entry
    pub newest_file: Option<DateTime<Utc>>,
}

/// Manages reading and writing cached feeds to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/jobfeed/` on Linux). Freshness is decided by the caller from the
/// stored `timestamp`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "jobfeed")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Filesystem-safe key for a feed URL
    pub fn cache_key(feed_url: &str) -> String {
        hex::encode(Sha256::digest(feed_url.as_bytes()))
    }

    /// Returns the path to the cache file for the given feed URL
    fn cache_path(&self, feed_url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", Self::cache_key(feed_url)))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes the listings of a feed, stamped with `fetched_at`
    ///
    /// Overwrites any previous entry for the same URL. The entry is written to
    /// a temp file and renamed into place, so readers see either the old or
    /// the new entry and concurrent writers never interleave.
    pub fn write(
        &self,
        feed_url: &str,
        jobs: &[JobListing],
        fetched_at: DateTime<Utc>,
    ) -> io::Result<()> {
        self.ensure_dir()?;

        let entry = FeedCacheEntry {
            feed_url: feed_url.to_string(),
            timestamp: fetched_at.timestamp_millis(),
            jobs: jobs.to_vec(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let path = self.cache_path(feed_url);
        let temp_path = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path).inspect_err(|_| {
            let _ = fs::remove_file(&temp_path);
        })
    }

    /// Reads the cached entry for a feed URL
    ///
    /// Returns `None` if the entry doesn't exist, cannot be read or cannot be
    /// parsed; all of these count as a miss.
    pub fn read(&self, feed_url: &str) -> Option<FeedCacheEntry> {
        let content = fs::read_to_string(self.cache_path(feed_url)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Deletes every cache file, returning how many were removed
    pub fn clear(&self) -> io::Result<usize> {
        let mut removed = 0;
        for path in self.entry_paths()? {
            fs::remove_file(path)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Counts cache files and reports their size and age range
    pub fn stats(&self) -> io::Result<CacheStats> {
        let mut stats = CacheStats::default();

        for path in self.entry_paths()? {
            stats.total_files += 1;
            stats.total_size += fs::metadata(&path)?.len();

            let fetched_at = fs::read_to_string(&path)
                .ok()
                .and_then(|c| serde_json::from_str::<FeedCacheEntry>(&c).ok())
                .map(|e| e.fetched_at());

            if let Some(at) = fetched_at {
                stats.oldest_file = Some(stats.oldest_file.map_or(at, |o| o.min(at)));
                stats.newest_file = Some(stats.newest_file.map_or(at, |n| n.max(at)));
            }
        }

        Ok(stats)
    }

    /// Paths of all `*.json` files in the cache directory
    fn entry_paths(&self) -> io::Result<Vec<PathBuf>> {
        let read_dir = match fs::read_dir(&self.cache_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
