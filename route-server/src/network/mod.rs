//! Transport network store.
//!
//! The persistence collaborator for locations and transportations. Route
//! search reads the network through [`EdgeSource`](crate::planner::EdgeSource)
//! and [`LocationLookup`](crate::planner::LocationLookup); everything else
//! goes through [`NetworkStore`].

mod error;
mod memory;
mod seed;

use std::future::Future;

use crate::domain::{EdgeDraft, EdgeId, Location, LocationDraft, LocationId, ScheduleEdge};

pub use error::StoreError;
pub use memory::InMemoryNetwork;
pub use seed::{Seed, SeedError, SeedLocation, SeedSummary, SeedTransportation, load_seed};

/// CRUD over locations and transportations.
///
/// Transportations are returned with both endpoint locations materialised as
/// they are at read time.
pub trait NetworkStore: Send + Sync {
    fn list_locations(&self) -> impl Future<Output = Result<Vec<Location>, StoreError>> + Send;

    fn get_location(
        &self,
        id: LocationId,
    ) -> impl Future<Output = Result<Location, StoreError>> + Send;

    /// Fails with `Conflict` if the code is already taken.
    fn create_location(
        &self,
        draft: LocationDraft,
    ) -> impl Future<Output = Result<Location, StoreError>> + Send;

    /// Fails with `Conflict` if the code is changed to one already taken.
    fn update_location(
        &self,
        id: LocationId,
        draft: LocationDraft,
    ) -> impl Future<Output = Result<Location, StoreError>> + Send;

    /// Fails with `Conflict` while any transportation references the location.
    fn delete_location(&self, id: LocationId)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_transportations(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduleEdge>, StoreError>> + Send;

    fn get_transportation(
        &self,
        id: EdgeId,
    ) -> impl Future<Output = Result<ScheduleEdge, StoreError>> + Send;

    /// Fails with `NotFound` if either endpoint does not exist.
    fn create_transportation(
        &self,
        draft: EdgeDraft,
    ) -> impl Future<Output = Result<ScheduleEdge, StoreError>> + Send;

    fn update_transportation(
        &self,
        id: EdgeId,
        draft: EdgeDraft,
    ) -> impl Future<Output = Result<ScheduleEdge, StoreError>> + Send;

    fn delete_transportation(&self, id: EdgeId)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}
