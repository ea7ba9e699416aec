//! Client-side reference data cache.
//!
//! Airports and airlines change rarely, so they are fetched once per
//! validity window and persisted across sessions in a small key-value
//! store. The [`ReferenceCache`] service owns the fetch-and-store
//! lifecycle; the [`KeyValueStore`] trait keeps the persistence medium
//! swappable (disk in production, memory in tests).

mod entry;
mod service;
mod store;

pub use entry::{CachedEntry, ValidityPolicy, DEFAULT_MAX_AGE};
pub use service::{
    InitOutcome, ReferenceCache, KEY_AIRLINES, KEY_AIRPORTS, KEY_LAST_REFRESH,
};
pub use store::{DiskStore, KeyValueStore, MemoryStore};

use thiserror::Error;

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error against the backing store
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted entry could not be encoded or decoded
    #[error("Cache entry codec error: {0}")]
    Codec(String),

    /// The upstream fetch feeding the cache failed
    #[error(transparent)]
    Fetch(#[from] crate::client::FetchError),
}
