//! In-process cache store backed by moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache as MokaCache;

use super::{CacheConfig, CacheError, CacheRegion, CacheStore};

/// Cached bytes plus the TTL they were written with.
#[derive(Debug, Clone)]
struct Entry {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// Expires each entry after the TTL supplied at write time.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache store with one moka cache per region.
pub struct MokaStore {
    routes: MokaCache<String, Entry>,
    locations: MokaCache<String, Entry>,
    transportations: MokaCache<String, Entry>,
}

impl MokaStore {
    /// Create a new store; each region holds at most `max_capacity` entries.
    pub fn new(config: &CacheConfig) -> Self {
        let build = || {
            MokaCache::builder()
                .max_capacity(config.max_capacity)
                .expire_after(PerEntryTtl)
                .build()
        };

        Self {
            routes: build(),
            locations: build(),
            transportations: build(),
        }
    }

    fn region(&self, region: CacheRegion) -> &MokaCache<String, Entry> {
        match region {
            CacheRegion::Routes => &self.routes,
            CacheRegion::Locations => &self.locations,
            CacheRegion::Transportations => &self.transportations,
        }
    }
}

impl CacheStore for MokaStore {
    async fn get(&self, region: CacheRegion, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self
            .region(region)
            .get(key)
            .await
            .map(|entry| entry.bytes.to_vec()))
    }

    async fn put(
        &self,
        region: CacheRegion,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            bytes: value.into(),
            ttl,
        };
        self.region(region).insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn evict(&self, region: CacheRegion, key: &str) -> Result<(), CacheError> {
        self.region(region).invalidate(key).await;
        Ok(())
    }

    async fn clear(&self, region: CacheRegion) -> Result<(), CacheError> {
        self.region(region).invalidate_all();
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        CacheRegion::ALL
            .iter()
            .map(|r| self.region(*r).entry_count())
            .sum()
    }
}
