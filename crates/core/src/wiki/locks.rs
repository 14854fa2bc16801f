//! Per-page mutual exclusion.
//!
//! Read-modify-write sequences on one page (load row, touch blobs, write row
//! back) hold that page's lock for their whole duration, so two writers on
//! the same page cannot interleave and lose an update. Different pages never
//! contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes keyed by page id.
#[derive(Debug, Default)]
pub struct PageLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl PageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `page_id`.
    ///
    /// Access lasts until the returned guard is dropped.
    pub async fn lock(&self, page_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Entries only referenced by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(page_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of pages with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}
