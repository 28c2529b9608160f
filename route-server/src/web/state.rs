//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheAside, CacheConfig, InstrumentedStore, MokaStore};
use crate::network::InMemoryNetwork;
use crate::service::NetworkService;

/// The concrete service the server runs.
pub type AppService = NetworkService<InMemoryNetwork, InstrumentedStore<MokaStore>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route search and CRUD, cached
    pub service: Arc<AppService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: InMemoryNetwork, cache_config: CacheConfig) -> Self {
        let store = InstrumentedStore::new(MokaStore::new(&cache_config));
        Self::from_service(NetworkService::new(network, CacheAside::new(store, cache_config)))
    }

    pub fn from_service(service: AppService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
