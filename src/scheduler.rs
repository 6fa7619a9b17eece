//! Background feed refresh
//!
//! `FeedScheduler` owns the periodic refresh task. Each pass walks the feed
//! list in small batches and force-refreshes every feed of a batch
//! concurrently, so the batch size bounds outbound requests.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, FeedCache};

/// Default period between refresh passes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Default number of feeds refreshed at the same time
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Outcome of one refresh pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Feeds fetched and written to the cache
    pub refreshed: usize,
    /// Feeds whose fetch failed
    pub failed: usize,
}

/// State shared between the handle and its background task
struct Refresher {
    feeds: Vec<String>,
    cache: FeedCache,
    batch_size: usize,
    /// Held for a whole pass so passes never overlap
    pass: tokio::sync::Mutex<()>,
    last_summary: Mutex<Option<RefreshSummary>>,
}

impl Refresher {
    async fn refresh_all(&self) -> RefreshSummary {
        let _pass = self.pass.lock().await;
        let mut summary = RefreshSummary::default();

        for batch in self.feeds.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|url| self.cache.refresh(url))).await;

            for (feed_url, result) in batch.iter().zip(results) {
                match result {
                    Ok(jobs) => {
                        summary.refreshed += 1;
                        debug!(%feed_url, jobs, "feed refreshed");
                    }
                    Err(error) => {
                        summary.failed += 1;
                        warn!(%feed_url, %error, "feed refresh failed");
                    }
                }
            }
        }

        info!(
            refreshed = summary.refreshed,
            failed = summary.failed,
            "refresh pass complete"
        );
        *lock(&self.last_summary) = Some(summary);
        summary
    }
}

/// Background task currently running
struct Running {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

/// Handle controlling periodic refreshes of a feed list
///
/// Moves between idle and running through `start` and `stop`; both are
/// no-ops when already in the target state. Dropping the handle stops the
/// background task.
pub struct FeedScheduler {
    refresher: Arc<Refresher>,
    state: Mutex<Option<Running>>,
}

impl FeedScheduler {
    /// Creates an idle scheduler over `feeds` with the default batch size
    pub fn new(feeds: Vec<String>, cache: FeedCache) -> Self {
        Self::with_batch_size(feeds, cache, DEFAULT_BATCH_SIZE)
    }

    /// Creates an idle scheduler refreshing `batch_size` feeds at a time
    pub fn with_batch_size(feeds: Vec<String>, cache: FeedCache, batch_size: usize) -> Self {
        Self {
            refresher: Arc::new(Refresher {
                feeds,
                cache,
                batch_size: batch_size.max(1),
                pass: tokio::sync::Mutex::new(()),
                last_summary: Mutex::new(None),
            }),
            state: Mutex::new(None),
        }
    }

    /// Refreshes every feed once, in batches
    ///
    /// Waits for any pass already in progress, so at most `batch_size`
    /// requests are ever in flight.
    pub async fn refresh_all(&self) -> RefreshSummary {
        self.refresher.refresh_all().await
    }

    /// Starts refreshing every `interval`, beginning with an immediate pass
    ///
    /// Returns `false` without doing anything if already running. Must be
    /// called from within a Tokio runtime.
    pub fn start(&self, interval: Duration) -> bool {
        let mut state = lock(&self.state);
        if state.as_ref().is_some_and(|r| !r.task.is_finished()) {
            debug!("scheduler already running");
            return false;
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let refresher = Arc::clone(&self.refresher);
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    // the first tick completes immediately: start-up pass
                    _ = ticker.tick() => {
                        refresher.refresh_all().await;
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
            debug!("scheduler task exited");
        });

        info!(interval_secs = period.as_secs(), "scheduler started");
        *state = Some(Running { shutdown_tx, task });
        true
    }

    /// Stops the periodic refresh
    ///
    /// Returns `false` if the scheduler was not running. A pass already in
    /// flight completes before the task exits; a pass started by a later
    /// `start` waits for it.
    pub fn stop(&self) -> bool {
        match lock(&self.state).take() {
            Some(running) => {
                let _ = running.shutdown_tx.try_send(());
                info!("scheduler stopped");
                true
            }
            None => false,
        }
    }

    /// Whether the periodic refresh is active
    pub fn is_running(&self) -> bool {
        lock(&self.state)
            .as_ref()
            .is_some_and(|r| !r.task.is_finished())
    }

    /// Summary of the most recent completed pass
    pub fn last_summary(&self) -> Option<RefreshSummary> {
        *lock(&self.refresher.last_summary)
    }

    /// Deletes all cache files, returning how many were removed
    pub fn clear_cache(&self) -> io::Result<usize> {
        match self.refresher.cache.manager() {
            Some(manager) => manager.clear(),
            None => Ok(0),
        }
    }

    /// Size and age range of the disk cache
    pub fn stats(&self) -> io::Result<CacheStats> {
        match self.refresher.cache.manager() {
            Some(manager) => manager.stats(),
            None => Ok(CacheStats::default()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
