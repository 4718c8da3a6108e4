//! Read-mostly TTL cache of fetched market snapshots.
//!
//! Readers call [`PriceCache::get`], which loads an `Arc<HashMap<..>>`
//! snapshot without locking. Writers copy the map, apply their change and
//! swap the new map in atomically, so a reader sees either the old or the
//! new contents, never a partial update.
//!
//! Implementation notes:
//! - Uses `arc-swap` for atomic pointer swaps + cheap reads (no RwLock).
//! - Entries are keyed by the validated [`FetchRequest`] (normalized symbol,
//!   start, end).
//! - An entry is never returned once `now >= fetched_at + ttl`. Stale entries
//!   are dropped the next time any entry is written, or by [`PriceCache::clear`].
//! - Writes copy the whole map. There is one analysis at a time and a handful
//!   of entries, so the copy is cheap.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};

use crate::models::{request::FetchRequest, snapshot::MarketSnapshot};

/// Default time-to-live for cached entries: one hour.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// A cached fetch result and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub snapshot: Arc<MarketSnapshot>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// `true` while `now` is strictly before `fetched_at + ttl`.
    pub fn is_live(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.fetched_at + ttl
    }
}

type CacheMap = HashMap<FetchRequest, CacheEntry>;

#[derive(Debug)]
pub struct PriceCache {
    ttl: Duration,
    entries: ArcSwap<CacheMap>,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: ArcSwap::from_pointee(CacheMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the snapshot for `key` if an entry exists and is still live
    /// at `now`.
    pub fn get(&self, key: &FetchRequest, now: DateTime<Utc>) -> Option<Arc<MarketSnapshot>> {
        let snap = self.entries.load();
        snap.get(key)
            .filter(|entry| entry.is_live(now, self.ttl))
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Stores `snapshot` under `key` stamped with `fetched_at`, replacing any
    /// previous entry for the key.
    pub fn insert(&self, key: FetchRequest, snapshot: Arc<MarketSnapshot>, fetched_at: DateTime<Utc>) {
        let entry = CacheEntry {
            snapshot,
            fetched_at,
        };
        let ttl = self.ttl;
        self.entries.rcu(|current| {
            let mut next: CacheMap = current
                .iter()
                .filter(|(_, e)| e.is_live(fetched_at, ttl))
                .map(|(k, e)| (k.clone(), e.clone()))
                .collect();
            next.insert(key.clone(), entry.clone());
            next
        });
    }

    /// Drops every entry regardless of age. Calling it on an empty cache is
    /// a no-op.
    pub fn clear(&self) {
        self.entries.store(Arc::new(CacheMap::new()));
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries that would still be served at `now`.
    pub fn live_len(&self, now: DateTime<Utc>) -> usize {
        self.entries
            .load()
            .values()
            .filter(|e| e.is_live(now, self.ttl))
            .count()
    }
}
