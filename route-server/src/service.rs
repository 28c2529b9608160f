//! Network service: cached reads and invalidating writes.
//!
//! Every read goes through the cache-aside layer. Every successful write
//! clears the `routes` region and the region of the entity written, after the
//! store has committed. Failed writes clear nothing.

use crate::cache::{ALL_KEY, CacheAside, CacheRegion, CacheStore};
use crate::domain::{
    DomainError, EdgeDraft, EdgeId, Itinerary, Location, LocationDraft, LocationId, ScheduleEdge,
};
use crate::network::{NetworkStore, StoreError};
use crate::planner::{EdgeSource, LocationLookup, RouteError, RoutePlanner, RouteQuery};

/// Errors surfaced by the network service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Input failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// The write conflicts with existing data
    #[error("{0}")]
    Conflict(String),

    /// Schedule edges could not be fetched for a route search
    #[error("{0}")]
    EdgeSource(String),

    /// The store could not serve the request
    #[error("{0}")]
    Unavailable(String),
}

impl From<RouteError> for ServiceError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
            RouteError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
            RouteError::EdgeSource(_) => ServiceError::EdgeSource(e.to_string()),
            RouteError::Lookup { .. } => ServiceError::Unavailable(e.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            StoreError::Invalid(d) => ServiceError::InvalidInput(d.to_string()),
            StoreError::Unavailable(_) => ServiceError::Unavailable(e.to_string()),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

/// Route search and CRUD over a network store, cached.
pub struct NetworkService<N, C> {
    store: N,
    cache: CacheAside<C>,
}

impl<N, C> NetworkService<N, C>
where
    N: NetworkStore + EdgeSource,
    C: CacheStore,
{
    pub fn new(store: N, cache: CacheAside<C>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &N {
        &self.store
    }

    pub fn cache(&self) -> &CacheAside<C> {
        &self.cache
    }

    /// Every itinerary for the query.
    ///
    /// Endpoints are resolved through the cached location lookups before the
    /// routes region is consulted, so an unknown id never reaches the edge
    /// source and never produces a routes entry.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<Vec<Itinerary>, ServiceError> {
        let locations = CachedLocations { service: self };
        let planner = RoutePlanner::new(&self.store, &locations);
        planner.resolve(query).await?;

        let routes = self
            .cache
            .get_or_compute(CacheRegion::Routes, &query.cache_key(), || {
                planner.plan(query.origin, query.destination, query.weekday())
            })
            .await?;
        Ok(routes)
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, ServiceError> {
        let locations = self
            .cache
            .get_or_compute(CacheRegion::Locations, ALL_KEY, || {
                self.store.list_locations()
            })
            .await?;
        Ok(locations)
    }

    pub async fn get_location(&self, id: LocationId) -> Result<Location, ServiceError> {
        let location = self
            .cache
            .get_or_compute(CacheRegion::Locations, &id.to_string(), || {
                self.store.get_location(id)
            })
            .await?;
        Ok(location)
    }

    pub async fn create_location(&self, draft: LocationDraft) -> Result<Location, ServiceError> {
        let location = self.store.create_location(draft).await?;
        self.invalidate_locations().await;
        Ok(location)
    }

    pub async fn update_location(
        &self,
        id: LocationId,
        draft: LocationDraft,
    ) -> Result<Location, ServiceError> {
        let location = self.store.update_location(id, draft).await?;
        self.invalidate_locations().await;
        Ok(location)
    }

    pub async fn delete_location(&self, id: LocationId) -> Result<(), ServiceError> {
        self.store.delete_location(id).await?;
        self.invalidate_locations().await;
        Ok(())
    }

    pub async fn list_transportations(&self) -> Result<Vec<ScheduleEdge>, ServiceError> {
        let edges = self
            .cache
            .get_or_compute(CacheRegion::Transportations, ALL_KEY, || {
                self.store.list_transportations()
            })
            .await?;
        Ok(edges)
    }

    pub async fn get_transportation(&self, id: EdgeId) -> Result<ScheduleEdge, ServiceError> {
        let edge = self
            .cache
            .get_or_compute(CacheRegion::Transportations, &id.to_string(), || {
                self.store.get_transportation(id)
            })
            .await?;
        Ok(edge)
    }

    pub async fn create_transportation(
        &self,
        draft: EdgeDraft,
    ) -> Result<ScheduleEdge, ServiceError> {
        let edge = self.store.create_transportation(draft).await?;
        self.invalidate_transportations().await;
        Ok(edge)
    }

    pub async fn update_transportation(
        &self,
        id: EdgeId,
        draft: EdgeDraft,
    ) -> Result<ScheduleEdge, ServiceError> {
        let edge = self.store.update_transportation(id, draft).await?;
        self.invalidate_transportations().await;
        Ok(edge)
    }

    pub async fn delete_transportation(&self, id: EdgeId) -> Result<(), ServiceError> {
        self.store.delete_transportation(id).await?;
        self.invalidate_transportations().await;
        Ok(())
    }

    async fn invalidate_locations(&self) {
        self.cache
            .invalidate(&[CacheRegion::Routes, CacheRegion::Locations])
            .await;
    }

    async fn invalidate_transportations(&self) {
        self.cache
            .invalidate(&[CacheRegion::Routes, CacheRegion::Transportations])
            .await;
    }
}

/// Location lookup served from the `locations` region.
struct CachedLocations<'a, N, C> {
    service: &'a NetworkService<N, C>,
}

impl<N, C> LocationLookup for CachedLocations<'_, N, C>
where
    N: NetworkStore + EdgeSource,
    C: CacheStore,
{
    async fn location(&self, id: LocationId) -> Result<Option<Location>, RouteError> {
        match self.service.get_location(id).await {
            Ok(location) => Ok(Some(location)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(RouteError::Lookup {
                id,
                message: e.to_string(),
            }),
        }
    }
}
