//! Route search: endpoint resolution, edge retrieval, enumeration.
//!
//! Finds every single-flight itinerary between two locations on a date.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{Itinerary, Location, LocationId, ScheduleEdge, Weekday};

use super::enumerate::enumerate_routes;
use super::index::EdgeIndex;

/// Which end of a route query an id was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// An endpoint id does not resolve to a location
    #[error("{endpoint} location {id} not found")]
    NotFound { endpoint: Endpoint, id: LocationId },

    /// Malformed query input
    #[error("invalid route query: {0}")]
    InvalidInput(String),

    /// The edge source could not supply edges
    #[error("failed to fetch schedule edges: {0}")]
    EdgeSource(String),

    /// The location lookup itself failed (as opposed to finding nothing)
    #[error("failed to look up location {id}: {message}")]
    Lookup { id: LocationId, message: String },
}

/// Request for route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteQuery {
    /// Where the traveller starts.
    pub origin: LocationId,

    /// Where the traveller wants to end up.
    pub destination: LocationId,

    /// The travel date.
    pub date: NaiveDate,
}

impl RouteQuery {
    /// Create a new route query.
    pub fn new(origin: LocationId, destination: LocationId, date: NaiveDate) -> Self {
        Self {
            origin,
            destination,
            date,
        }
    }

    /// Build a query from raw input, parsing an ISO `YYYY-MM-DD` date.
    pub fn parse(origin: i64, destination: i64, date: &str) -> Result<Self, RouteError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| RouteError::InvalidInput(format!("invalid date {date:?}: {e}")))?;
        Ok(Self::new(LocationId(origin), LocationId(destination), date))
    }

    /// The ISO weekday the query date falls on.
    pub fn weekday(&self) -> Weekday {
        Weekday::from_date(self.date)
    }

    /// Deterministic cache key: `route:{origin}:{destination}:{iso date}`.
    pub fn cache_key(&self) -> String {
        format!(
            "route:{}:{}:{}",
            self.origin,
            self.destination,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Source of the schedule edges relevant to one query.
///
/// Implementations must return every flight active on `weekday` plus every
/// ground edge active on `weekday` that leaves `origin` or reaches
/// `destination`, with both endpoint locations fully materialised.
pub trait EdgeSource: Send + Sync {
    fn relevant_edges(
        &self,
        origin: LocationId,
        destination: LocationId,
        weekday: Weekday,
    ) -> impl Future<Output = Result<Vec<ScheduleEdge>, RouteError>> + Send;
}

/// Resolves location ids.
pub trait LocationLookup: Send + Sync {
    /// Returns `Ok(None)` when no location has this id.
    fn location(
        &self,
        id: LocationId,
    ) -> impl Future<Output = Result<Option<Location>, RouteError>> + Send;
}

/// Route planner over an edge source and a location lookup.
pub struct RoutePlanner<'a, E: EdgeSource, L: LocationLookup> {
    edges: &'a E,
    locations: &'a L,
}

impl<'a, E: EdgeSource, L: LocationLookup> RoutePlanner<'a, E, L> {
    /// Create a new planner.
    pub fn new(edges: &'a E, locations: &'a L) -> Self {
        Self { edges, locations }
    }

    /// Find every itinerary for the query.
    ///
    /// Fails with `NotFound` before touching the edge source if either
    /// endpoint does not resolve.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<Vec<Itinerary>, RouteError> {
        self.resolve(query).await?;
        self.plan(query.origin, query.destination, query.weekday())
            .await
    }

    /// Resolve both endpoints, origin first.
    pub async fn resolve(&self, query: &RouteQuery) -> Result<(Location, Location), RouteError> {
        let origin = self.resolve_one(Endpoint::Origin, query.origin).await?;
        let destination = self
            .resolve_one(Endpoint::Destination, query.destination)
            .await?;
        Ok((origin, destination))
    }

    async fn resolve_one(
        &self,
        endpoint: Endpoint,
        id: LocationId,
    ) -> Result<Location, RouteError> {
        self.locations
            .location(id)
            .await?
            .ok_or(RouteError::NotFound { endpoint, id })
    }

    /// Fetch, index and enumerate edges for already-resolved endpoints.
    pub async fn plan(
        &self,
        origin: LocationId,
        destination: LocationId,
        weekday: Weekday,
    ) -> Result<Vec<Itinerary>, RouteError> {
        let edges = self
            .edges
            .relevant_edges(origin, destination, weekday)
            .await?;
        let edge_count = edges.len();

        let index = EdgeIndex::build(origin, destination, edges);
        let routes = enumerate_routes(&index);

        tracing::debug!(
            %origin,
            %destination,
            %weekday,
            edges = edge_count,
            flights = index.flight_count(),
            arrivals = index.ground_to_destination_count(),
            dropped = index.dropped_count(),
            routes = routes.len(),
            "enumerated routes"
        );

        Ok(routes)
    }
}
