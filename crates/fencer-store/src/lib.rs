//! Persistence for fencer lookups: a flat JSON key/value store, the TTL cache
//! layered over it, and the user's tracked-fencer list.

pub mod cache;
pub mod clock;
pub mod keys;
pub mod kv;
pub mod sqlite;
pub mod tracked;

pub use cache::{CacheEntry, CacheStats, TtlCache, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use kv::{KvStore, MemoryStore};
pub use sqlite::SqliteStore;
pub use tracked::{TrackedFencers, TRACKED_KEY};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("stored value is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}
