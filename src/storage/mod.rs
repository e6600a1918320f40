//! Durable storage for the cache entry.
//!
//! The coordinator persists its last successful result so a restart within
//! the TTL window does not cost an upstream fetch. The encoding is an
//! internal detail; only exact round-tripping matters.

pub mod local;

use async_trait::async_trait;

use crate::cache::CacheEntry;
use crate::error::Result;

// Re-export for convenience
pub use local::FileStore;

/// Capability for persisting and recovering the cache entry.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Load the stored entry, if any.
    ///
    /// A corrupted or unreadable stored entry reads as `None`; it must
    /// never be fatal to startup.
    async fn load(&self) -> Result<Option<CacheEntry>>;

    /// Persist the entry, replacing any previous one atomically.
    async fn save(&self, entry: &CacheEntry) -> Result<()>;
}
