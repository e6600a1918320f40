// src/cache/mod.rs

//! Time-boxed cache coordinating between callers and the upstream fetch.
//!
//! The flight board page is expensive to fetch and the site is small, so
//! callers never hit it directly. `FlightCache` owns one logical slot that
//! is Empty, Fresh (`now - captured_at <= TTL`) or Stale, evaluated lazily
//! at read time. Staleness triggers exactly one refresh no matter how many
//! callers observe it; refresh failures fall back to the previous entry
//! when one exists.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::fetch::Fetcher;
use crate::models::{Config, FlightSet};
use crate::services::{FlightExtractor, MarkerTableLocator, TableLocator};
use crate::storage::EntryStore;

/// Wall-clock capability, injected so tests can drive staleness.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The last successfully fetched-and-extracted result.
///
/// Replaced as a whole on every successful refresh; readers see either the
/// previous complete entry or the new one, never a mix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    /// When the refresh that produced this entry completed
    pub captured_at: DateTime<Utc>,

    /// The extracted flight board
    pub data: FlightSet,
}

impl CacheEntry {
    fn snapshot(&self) -> CachedFlights {
        CachedFlights {
            captured_at: self.captured_at,
            data: self.data.clone(),
        }
    }
}

/// What callers receive: the flight board plus the time it was captured.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CachedFlights {
    pub captured_at: DateTime<Utc>,
    pub data: FlightSet,
}

/// Cache coordinator for the flight board.
///
/// All collaborators are constructor-injected; there is no process-wide
/// state. Share one instance (e.g. behind an `Arc`) across callers.
pub struct FlightCache<F, C, S, L = MarkerTableLocator> {
    fetcher: F,
    clock: C,
    store: S,
    extractor: FlightExtractor<L>,
    url: String,
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
    // Held across a whole refresh attempt so concurrent callers that
    // observed the same staleness window share one attempt's outcome.
    refresh_guard: Mutex<()>,
    // Bumped after every refresh attempt, failed ones included. A caller
    // that queued on the guard compares this against the value it saw
    // before observing staleness: a change means an attempt already ran
    // for its window, so it must not fetch again.
    attempts: AtomicU64,
}

impl<F, C, S> FlightCache<F, C, S, MarkerTableLocator>
where
    F: Fetcher,
    C: Clock,
    S: EntryStore,
{
    /// Open a cache with the default marker-based extractor, recovering
    /// the persisted entry if one exists and is still within TTL.
    pub async fn open(config: &Config, fetcher: F, clock: C, store: S) -> Self {
        Self::open_with_extractor(config, fetcher, clock, store, FlightExtractor::new()).await
    }
}

impl<F, C, S, L> FlightCache<F, C, S, L>
where
    F: Fetcher,
    C: Clock,
    S: EntryStore,
    L: TableLocator,
{
    /// Open a cache with a custom extractor.
    pub async fn open_with_extractor(
        config: &Config,
        fetcher: F,
        clock: C,
        store: S,
        extractor: FlightExtractor<L>,
    ) -> Self {
        let ttl = Duration::seconds(config.cache.ttl_secs as i64);

        // A corrupted or unreadable stored entry is the same as no entry.
        let persisted = store.load().await.unwrap_or_else(|e| {
            log::warn!("Failed to load persisted cache entry: {e}");
            None
        });
        let entry = persisted.filter(|entry| {
            let age = clock.now() - entry.captured_at;
            if age <= ttl {
                log::info!("Adopting persisted cache entry from {}", entry.captured_at);
                true
            } else {
                log::info!("Persisted cache entry from {} is stale, ignoring", entry.captured_at);
                false
            }
        });

        Self {
            fetcher,
            clock,
            store,
            extractor,
            url: config.source.url.clone(),
            ttl,
            slot: RwLock::new(entry),
            refresh_guard: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Return the current flight board, refreshing it when stale.
    ///
    /// Fresh entries are served as-is. A stale or missing entry triggers a
    /// single refresh shared by all concurrent callers. If the refresh
    /// fails and an old entry exists it is served unchanged (availability
    /// over strict freshness); the only propagated error is `Upstream`,
    /// raised when no data has ever been obtained.
    pub async fn get_current_data(&self) -> Result<CachedFlights> {
        let observed = self.attempts.load(Ordering::Acquire);
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let _guard = self.refresh_guard.lock().await;

        // Callers that waited out someone else's successful refresh find
        // the slot fresh here and share that refresh's outcome.
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        // The slot is still stale, but if an attempt completed while this
        // caller queued, that attempt failed and covers this caller's
        // staleness window too. Share its fallback instead of fetching.
        if self.attempts.load(Ordering::Acquire) != observed {
            return self.stale_fallback("a shared refresh attempt failed").await;
        }

        let result = self.refresh().await;
        self.attempts.fetch_add(1, Ordering::Release);
        match result {
            Ok(snapshot) => Ok(snapshot),
            Err(error) => {
                self.stale_fallback(&format!("refresh failed: {error}"))
                    .await
            }
        }
    }

    /// Serve the previous entry after a failed refresh, or raise the one
    /// propagated error when no entry has ever been committed.
    async fn stale_fallback(&self, context: &str) -> Result<CachedFlights> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) => {
                log::warn!("{context}; serving stale entry from {}", entry.captured_at);
                Ok(entry.snapshot())
            }
            None => Err(AppError::upstream(format!(
                "no cached flight data and {context}"
            ))),
        }
    }

    /// Snapshot the slot if it holds a fresh entry.
    async fn fresh_snapshot(&self) -> Option<CachedFlights> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        if self.clock.now() - entry.captured_at <= self.ttl {
            Some(entry.snapshot())
        } else {
            None
        }
    }

    /// Fetch, extract and commit a new entry. Caller holds the refresh guard.
    async fn refresh(&self) -> Result<CachedFlights> {
        log::info!("Refreshing flight data from {}", self.url);
        let body = self.fetcher.fetch(&self.url).await?;
        let data = self.extractor.extract(&body)?;
        let entry = CacheEntry {
            captured_at: self.clock.now(),
            data,
        };

        // Persist before publishing. A failed persist costs restart
        // recovery, not the refresh itself.
        if let Err(error) = self.store.save(&entry).await {
            log::warn!("Failed to persist cache entry: {error}");
        }

        let snapshot = entry.snapshot();
        *self.slot.write().await = Some(entry);
        Ok(snapshot)
    }
}
