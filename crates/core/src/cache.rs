//! Time-bounded cache for the full page listing.
//!
//! Holds a single entry, the materialized result of the "all pages" scan,
//! under a fixed key. The entry expires after the configured TTL and is
//! dropped by [`PageListCache::invalidate`] on every write to the page set.
//!
//! A reader that misses loads the listing itself and offers it back with
//! [`PageListCache::insert_if_current`]. Offers are tagged with the
//! generation observed before loading; an invalidation in between bumps the
//! generation and the stale offer is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;

use crate::model::Page;

const ALL_PAGES_KEY: &str = "all-pages";

/// Default lifetime of a cached listing.
pub const DEFAULT_PAGE_LIST_TTL: Duration = Duration::from_secs(30 * 60);

/// Single-entry cache of the page listing.
#[derive(Debug)]
pub struct PageListCache {
    inner: Cache<String, Arc<Vec<Page>>>,
    generation: AtomicU64,
    /// Orders inserts against invalidations.
    write_lock: Mutex<()>,
    ttl: Duration,
}

impl PageListCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).build(),
            generation: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached listing, if present and not expired.
    pub async fn get(&self) -> Option<Arc<Vec<Page>>> {
        self.inner.get(ALL_PAGES_KEY).await
    }

    /// Generation token to pass to [`Self::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Cache `pages` unless an invalidation happened since `generation` was read.
    ///
    /// Returns whether the listing was stored.
    pub async fn insert_if_current(&self, generation: u64, pages: Arc<Vec<Page>>) -> bool {
        let _guard = self.write_lock.lock().await;
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(generation, "discarding page listing loaded before an invalidation");
            return false;
        }
        self.inner.insert(ALL_PAGES_KEY.to_string(), pages).await;
        true
    }

    /// Drop the cached listing.
    pub async fn invalidate(&self) {
        let _guard = self.write_lock.lock().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.invalidate(ALL_PAGES_KEY).await;
        tracing::debug!("page listing cache invalidated");
    }
}

impl Default for PageListCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIST_TTL)
    }
}
