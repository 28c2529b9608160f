//! Observability decorator for cache stores.
//!
//! [`InstrumentedStore`] wraps any [`CacheStore`], emitting one `tracing`
//! event per operation and counting outcomes. Results from the wrapped store
//! are returned unchanged, errors included.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::{CacheError, CacheRegion, CacheStore};

/// Kind of cache operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    Hit,
    Miss,
    Put,
    Evict,
    Clear,
}

impl fmt::Display for CacheEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CacheEventKind::Hit => "HIT",
            CacheEventKind::Miss => "MISS",
            CacheEventKind::Put => "PUT",
            CacheEventKind::Evict => "EVICT",
            CacheEventKind::Clear => "CLEAR",
        };
        f.write_str(s)
    }
}

/// One recorded cache operation. `key` is `None` for region clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    pub kind: CacheEventKind,
    pub region: CacheRegion,
    pub key: Option<String>,
}

/// Shared, append-only record of cache events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<CacheEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: CacheEvent) {
        // A poisoned log only loses diagnostics.
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Copy of every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<CacheEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Kinds of recorded events for one region, oldest first.
    pub fn kinds_for(&self, region: CacheRegion) -> Vec<CacheEventKind> {
        self.events()
            .into_iter()
            .filter(|e| e.region == region)
            .map(|e| e.kind)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

/// Running counters of cache outcomes.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    evictions: AtomicU64,
    clears: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub evictions: u64,
    pub clears: u64,
    pub errors: u64,
}

impl CacheStats {
    fn record(&self, kind: CacheEventKind) {
        let counter = match kind {
            CacheEventKind::Hit => &self.hits,
            CacheEventKind::Miss => &self.misses,
            CacheEventKind::Put => &self.puts,
            CacheEventKind::Evict => &self.evictions,
            CacheEventKind::Clear => &self.clears,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Cache store decorator that logs and counts every operation.
pub struct InstrumentedStore<S> {
    inner: S,
    stats: CacheStats,
    log: Option<EventLog>,
}

impl<S: CacheStore> InstrumentedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: CacheStats::default(),
            log: None,
        }
    }

    /// Also append every event to `log`.
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn emit(&self, kind: CacheEventKind, region: CacheRegion, key: Option<&str>) {
        tracing::debug!(
            event = %kind,
            region = region.name(),
            key = key.unwrap_or("*"),
            "cache"
        );
        self.stats.record(kind);
        if let Some(log) = &self.log {
            log.push(CacheEvent {
                kind,
                region,
                key: key.map(str::to_string),
            });
        }
    }

    fn failed(&self, op: &str, region: CacheRegion, key: Option<&str>, err: &CacheError) {
        tracing::debug!(
            op,
            region = region.name(),
            key = key.unwrap_or("*"),
            error = %err,
            "cache operation failed"
        );
        self.stats.record_error();
    }
}

impl<S: CacheStore> CacheStore for InstrumentedStore<S> {
    async fn get(&self, region: CacheRegion, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let result = self.inner.get(region, key).await;
        match &result {
            Ok(Some(_)) => self.emit(CacheEventKind::Hit, region, Some(key)),
            Ok(None) => self.emit(CacheEventKind::Miss, region, Some(key)),
            Err(e) => self.failed("get", region, Some(key), e),
        }
        result
    }

    async fn put(
        &self,
        region: CacheRegion,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let result = self.inner.put(region, key, value, ttl).await;
        match &result {
            Ok(()) => self.emit(CacheEventKind::Put, region, Some(key)),
            Err(e) => self.failed("put", region, Some(key), e),
        }
        result
    }

    async fn evict(&self, region: CacheRegion, key: &str) -> Result<(), CacheError> {
        let result = self.inner.evict(region, key).await;
        match &result {
            Ok(()) => self.emit(CacheEventKind::Evict, region, Some(key)),
            Err(e) => self.failed("evict", region, Some(key), e),
        }
        result
    }

    async fn clear(&self, region: CacheRegion) -> Result<(), CacheError> {
        let result = self.inner.clear(region).await;
        match &result {
            Ok(()) => self.emit(CacheEventKind::Clear, region, None),
            Err(e) => self.failed("clear", region, None, e),
        }
        result
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
