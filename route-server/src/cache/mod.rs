//! Cache-aside layer.
//!
//! Results are memoized per region as serialized bytes with a region TTL.
//! Reads go through [`CacheAside::get_or_compute`]; writes elsewhere in the
//! system clear whole regions through [`CacheAside::invalidate`].
//!
//! The cache is never authoritative. A store that fails on every call still
//! yields correct results, only slower.

mod aside;
mod instrument;
mod store;

use std::fmt;
use std::future::Future;
use std::time::Duration;

pub use aside::{ALL_KEY, CacheAside};
pub use instrument::{
    CacheEvent, CacheEventKind, CacheStats, EventLog, InstrumentedStore, StatsSnapshot,
};
pub use store::MokaStore;

/// Independently TTL'd namespace of cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    /// Route search results, keyed by `route:{origin}:{destination}:{date}`.
    Routes,
    /// Locations, keyed by id or `all`.
    Locations,
    /// Transportations, keyed by id or `all`.
    Transportations,
}

impl CacheRegion {
    pub const ALL: [CacheRegion; 3] = [
        CacheRegion::Routes,
        CacheRegion::Locations,
        CacheRegion::Transportations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CacheRegion::Routes => "routes",
            CacheRegion::Locations => "locations",
            CacheRegion::Transportations => "transportations",
        }
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for route search results.
    pub routes_ttl: Duration,

    /// TTL for location lookups.
    pub locations_ttl: Duration,

    /// TTL for transportation lookups.
    pub transportations_ttl: Duration,

    /// Maximum number of entries per region.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// TTL applied to entries written into a region.
    pub fn ttl(&self, region: CacheRegion) -> Duration {
        match region {
            CacheRegion::Routes => self.routes_ttl,
            CacheRegion::Locations => self.locations_ttl,
            CacheRegion::Transportations => self.transportations_ttl,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            routes_ttl: Duration::from_secs(10 * 60),
            locations_ttl: Duration::from_secs(30 * 60),
            transportations_ttl: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache store failure. Never surfaced to callers of the cache-aside layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Keyed byte store with per-entry TTL, partitioned into regions.
pub trait CacheStore: Send + Sync {
    /// Returns `Ok(None)` on a miss or an expired entry.
    fn get(
        &self,
        region: CacheRegion,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, CacheError>> + Send;

    fn put(
        &self,
        region: CacheRegion,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn evict(
        &self,
        region: CacheRegion,
        key: &str,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Remove every entry in a region.
    fn clear(&self, region: CacheRegion) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Approximate number of live entries across all regions.
    fn entry_count(&self) -> u64;
}

/// Store whose every operation fails, for exercising fallback paths.
#[cfg(test)]
pub(crate) struct UnavailableStore;

#[cfg(test)]
impl CacheStore for UnavailableStore {
    async fn get(&self, _: CacheRegion, _: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn put(
        &self,
        _: CacheRegion,
        _: &str,
        _: Vec<u8>,
        _: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn evict(&self, _: CacheRegion, _: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn clear(&self, _: CacheRegion) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    fn entry_count(&self) -> u64 {
        0
    }
}
