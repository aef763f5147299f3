//! Expiring cache records over a [`KvStore`].
//!
//! Each record is stored as `{ "value": ..., "expiresAt": <epoch ms> }`.
//! Expiry is lazy: a stale record is deleted when it is read, or when
//! [`TtlCache::purge_expired`] is called. Nothing runs in the background.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{duration_millis, Clock, SystemClock};
use crate::kv::KvStore;
use crate::StoreError;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T = Value> {
    pub value: T,
    pub expires_at: i64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub active: usize,
    pub expired: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct TtlCache<S, C = SystemClock> {
    store: S,
    clock: C,
    default_ttl: Duration,
}

impl<S: KvStore> TtlCache<S> {
    /// A cache on the system clock with a 24h default TTL.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KvStore, C: Clock> TtlCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            default_ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the live value under `key`.
    ///
    /// An expired record is deleted and reported as a miss. Records that are
    /// not cache entries, or whose value does not fit `T`, are also misses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying store fails.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        let entry: CacheEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring non-cache record");
                return Ok(None);
            }
        };

        if entry.is_expired(self.clock.now_millis()) {
            tracing::debug!(key, expires_at = entry.expires_at, "cache entry expired");
            self.store.remove(&[key.to_string()]).await?;
            return Ok(None);
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value has unexpected shape");
                Ok(None)
            }
        }
    }

    /// Stores `value` under `key` for the default TTL, overwriting any entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `value` cannot be serialized or the write fails.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if `value` cannot be serialized or the write fails.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let entry = CacheEntry {
            value: serde_json::to_value(value)?,
            expires_at: self.clock.now_millis().saturating_add(duration_millis(ttl)),
        };
        self.store.set(key, serde_json::to_value(entry)?).await
    }

    /// Deletes every expired cache record and returns how many were removed.
    /// Records without an expiry (e.g. the tracked list) are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan or delete fails.
    pub async fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = self.clock.now_millis();
        let expired: Vec<String> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter_map(|(key, raw)| {
                let entry: CacheEntry = serde_json::from_value(raw).ok()?;
                entry.is_expired(now).then_some(key)
            })
            .collect();

        if !expired.is_empty() {
            self.store.remove(&expired).await?;
        }
        tracing::debug!(purged = expired.len(), "purged expired cache entries");
        Ok(expired.len())
    }

    /// Wipes the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be cleared.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }

    /// Counts cache records by liveness without deleting anything.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be scanned.
    pub async fn stats(&self) -> Result<CacheStats, StoreError> {
        let now = self.clock.now_millis();
        let mut stats = CacheStats::default();
        for (_, raw) in self.store.get_all().await? {
            let Ok(entry) = serde_json::from_value::<CacheEntry>(raw) else {
                continue;
            };
            if entry.is_expired(now) {
                stats.expired += 1;
            } else {
                stats.active += 1;
            }
        }
        stats.total = stats.active + stats.expired;
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
