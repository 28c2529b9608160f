//! Read-through memoization and region invalidation over a [`CacheStore`].

use std::future::Future;

use futures::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CacheConfig, CacheRegion, CacheStore};

/// Key under which list-all results are cached.
pub const ALL_KEY: &str = "all";

/// Cache-aside access to a store.
pub struct CacheAside<S> {
    store: S,
    config: CacheConfig,
}

impl<S: CacheStore> CacheAside<S> {
    pub fn new(store: S, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// Store failures and undecodable entries fall back to `compute`. Errors
    /// from `compute` are returned and never cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        region: CacheRegion,
        key: &str,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(region, key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        region = region.name(),
                        key,
                        error = %e,
                        "discarding undecodable cache entry"
                    );
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    region = region.name(),
                    key,
                    error = %e,
                    "cache read failed, computing"
                );
            }
        }

        let value = compute().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                let ttl = self.config.ttl(region);
                if let Err(e) = self.store.put(region, key, bytes, ttl).await {
                    tracing::warn!(region = region.name(), key, error = %e, "cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(
                    region = region.name(),
                    key,
                    error = %e,
                    "failed to encode value for cache"
                );
            }
        }

        Ok(value)
    }

    /// Clear every listed region concurrently. Failures are logged and
    /// skipped; the clears are not atomic as a group.
    pub async fn invalidate(&self, regions: &[CacheRegion]) {
        let clears: Vec<_> = regions
            .iter()
            .map(|&region| async move { (region, self.store.clear(region).await) })
            .collect();

        for (region, result) in join_all(clears).await {
            if let Err(e) = result {
                tracing::warn!(region = region.name(), error = %e, "cache clear failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEventKind, EventLog, InstrumentedStore, MokaStore, UnavailableStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn aside() -> (CacheAside<InstrumentedStore<MokaStore>>, EventLog) {
        let config = CacheConfig::default();
        let log = EventLog::new();
        let store = InstrumentedStore::new(MokaStore::new(&config)).with_event_log(log.clone());
        (CacheAside::new(store, config), log)
    }

    #[tokio::test]
    async fn second_read_is_a_hit() {
        let (cache, log) = aside();
        let calls = &AtomicUsize::new(0);

        let compute = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(vec![1, 2, 3])
        };

        let first: Vec<i32> = cache
            .get_or_compute(CacheRegion::Routes, "route:1:2:2025-03-10", compute)
            .await
            .unwrap();
        let second: Vec<i32> = cache
            .get_or_compute(CacheRegion::Routes, "route:1:2:2025-03-10", compute)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            log.kinds_for(CacheRegion::Routes),
            vec![CacheEventKind::Miss, CacheEventKind::Put, CacheEventKind::Hit]
        );
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let (cache, log) = aside();

        let err: Result<Vec<i32>, String> = cache
            .get_or_compute(CacheRegion::Routes, "k", || async { Err("boom".to_string()) })
            .await;
        assert_eq!(err, Err("boom".to_string()));

        let ok: Result<Vec<i32>, String> = cache
            .get_or_compute(CacheRegion::Routes, "k", || async { Ok(vec![7]) })
            .await;
        assert_eq!(ok, Ok(vec![7]));

        assert_eq!(
            log.kinds_for(CacheRegion::Routes),
            vec![CacheEventKind::Miss, CacheEventKind::Miss, CacheEventKind::Put]
        );
    }

    #[tokio::test]
    async fn failing_store_still_computes() {
        let cache = CacheAside::new(UnavailableStore, CacheConfig::default());
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let value: String = cache
                .get_or_compute(CacheRegion::Locations, ALL_KEY, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("fresh".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "fresh");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Clear failures are swallowed.
        cache.invalidate(&CacheRegion::ALL).await;
    }

    #[tokio::test]
    async fn undecodable_entry_is_recomputed_and_overwritten() {
        let (cache, _log) = aside();
        cache
            .store()
            .put(CacheRegion::Locations, "3", b"not json".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let value: u32 = cache
            .get_or_compute(CacheRegion::Locations, "3", || async { Ok::<_, String>(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);

        let bytes = cache.store().get(CacheRegion::Locations, "3").await.unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"42"[..]));
    }

    #[tokio::test]
    async fn invalidate_clears_only_listed_regions() {
        let (cache, log) = aside();
        for region in CacheRegion::ALL {
            let _: u8 = cache
                .get_or_compute(region, ALL_KEY, || async { Ok::<_, String>(1) })
                .await
                .unwrap();
        }
        log.clear();

        cache
            .invalidate(&[CacheRegion::Routes, CacheRegion::Locations])
            .await;

        assert_eq!(log.kinds_for(CacheRegion::Routes), vec![CacheEventKind::Clear]);
        assert_eq!(log.kinds_for(CacheRegion::Locations), vec![CacheEventKind::Clear]);
        assert!(log.kinds_for(CacheRegion::Transportations).is_empty());

        let hit = cache
            .store()
            .get(CacheRegion::Transportations, ALL_KEY)
            .await
            .unwrap();
        assert!(hit.is_some());
        let miss = cache.store().get(CacheRegion::Routes, ALL_KEY).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn region_ttl_applied() {
        let config = CacheConfig {
            routes_ttl: Duration::from_millis(50),
            ..CacheConfig::default()
        };
        let cache = CacheAside::new(MokaStore::new(&config), config);
        let calls = &AtomicUsize::new(0);
        let compute = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(0u8)
        };

        cache.get_or_compute(CacheRegion::Routes, "k", compute).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        cache.get_or_compute(CacheRegion::Routes, "k", compute).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
