//! The user's tracked-fencer list: a single list-valued key with no expiry.

use fencer_core::TrackedFencer;
use serde_json::Value;

use crate::kv::KvStore;
use crate::StoreError;

pub const TRACKED_KEY: &str = "fsTrackedFencers";

#[derive(Debug, Clone)]
pub struct TrackedFencers<S> {
    store: S,
}

impl<S: KvStore> TrackedFencers<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the list. Older object-map payloads (`{ "<id>": entry }`) are
    /// read as a list of their values; entries that do not parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn list(&self) -> Result<Vec<TrackedFencer>, StoreError> {
        let raw = match self.store.get(TRACKED_KEY).await? {
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) => map.into_values().collect(),
            Some(other) => {
                tracing::warn!(kind = ?other, "tracked list has unexpected shape; treating as empty");
                return Ok(Vec::new());
            }
            None => return Ok(Vec::new()),
        };

        Ok(raw
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<TrackedFencer>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed tracked entry");
                    None
                }
            })
            .collect())
    }

    /// Replaces the whole list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn save(&self, entries: &[TrackedFencer]) -> Result<(), StoreError> {
        self.store
            .set(TRACKED_KEY, serde_json::to_value(entries)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.list().await?.iter().any(|e| e.id == id))
    }

    /// Adds `entry` if its id is not tracked, otherwise removes it. Returns
    /// whether the fencer is tracked afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read or write fails.
    pub async fn toggle(&self, entry: TrackedFencer) -> Result<bool, StoreError> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|e| e.id != entry.id);
        let now_tracked = entries.len() == before;
        if now_tracked {
            entries.push(entry);
        }
        self.save(&entries).await?;
        Ok(now_tracked)
    }

    /// Adds `entry`, replacing any existing entry with the same id in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read or write fails.
    pub async fn upsert(&self, entry: TrackedFencer) -> Result<(), StoreError> {
        let mut entries = self.list().await?;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        self.save(&entries).await
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read or write fails.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries).await?;
        Ok(true)
    }
}
