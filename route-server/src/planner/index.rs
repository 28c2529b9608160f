//! Edge index for single-flight route composition.
//!
//! Every itinerary is built around exactly one flight. Partitioning the
//! relevant edges once into flights and ground transfers, and keying them by
//! the endpoint each rule joins on, turns every pattern into a chain of map
//! lookups instead of nested scans.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{LocationId, ScheduleEdge};

/// Relevant edges for one query, partitioned and keyed by endpoint.
///
/// Lists keep the order the edge source returned the edges in.
#[derive(Debug)]
pub struct EdgeIndex {
    /// Requested origin.
    origin: LocationId,

    /// Requested destination.
    destination: LocationId,

    /// Every flight, keyed by its origin airport.
    flights_by_origin: HashMap<LocationId, Vec<Arc<ScheduleEdge>>>,

    /// Ground transfers leaving the requested origin.
    ground_from_origin: Vec<Arc<ScheduleEdge>>,

    /// Ground transfers reaching the requested destination, keyed by the
    /// airport they leave from.
    ground_to_destination: HashMap<LocationId, Vec<Arc<ScheduleEdge>>>,

    /// Number of flights indexed.
    flight_count: usize,

    /// Number of ground edges touching neither endpoint.
    dropped: usize,
}

impl EdgeIndex {
    /// Partition and index the edges returned for a query.
    ///
    /// A ground edge that both leaves the origin and reaches the destination
    /// lands in both ground lists. Ground edges touching neither endpoint are
    /// dropped.
    pub fn build(origin: LocationId, destination: LocationId, edges: Vec<ScheduleEdge>) -> Self {
        let mut flights_by_origin: HashMap<LocationId, Vec<Arc<ScheduleEdge>>> = HashMap::new();
        let mut ground_from_origin = Vec::new();
        let mut ground_to_destination: HashMap<LocationId, Vec<Arc<ScheduleEdge>>> =
            HashMap::new();
        let mut flight_count = 0;
        let mut dropped = 0;

        for edge in edges {
            let edge = Arc::new(edge);

            if edge.is_flight() {
                flight_count += 1;
                flights_by_origin
                    .entry(edge.origin().id)
                    .or_default()
                    .push(edge);
                continue;
            }

            let leaves_origin = edge.origin().id == origin;
            let reaches_destination = edge.destination().id == destination;

            if leaves_origin {
                ground_from_origin.push(edge.clone());
            }
            if reaches_destination {
                ground_to_destination
                    .entry(edge.origin().id)
                    .or_default()
                    .push(edge.clone());
            }
            if !leaves_origin && !reaches_destination {
                dropped += 1;
            }
        }

        Self {
            origin,
            destination,
            flights_by_origin,
            ground_from_origin,
            ground_to_destination,
            flight_count,
            dropped,
        }
    }

    /// Get the requested origin.
    pub fn origin(&self) -> LocationId {
        self.origin
    }

    /// Get the requested destination.
    pub fn destination(&self) -> LocationId {
        self.destination
    }

    /// Flights departing from an airport.
    pub fn flights_from(&self, airport: LocationId) -> &[Arc<ScheduleEdge>] {
        self.flights_by_origin
            .get(&airport)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ground transfers leaving the requested origin.
    pub fn ground_from_origin(&self) -> &[Arc<ScheduleEdge>] {
        &self.ground_from_origin
    }

    /// Ground transfers from an airport to the requested destination.
    pub fn ground_to_destination_from(&self, airport: LocationId) -> &[Arc<ScheduleEdge>] {
        self.ground_to_destination
            .get(&airport)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the number of flights indexed.
    pub fn flight_count(&self) -> usize {
        self.flight_count
    }

    /// Get the number of ground transfers that reach the destination.
    pub fn ground_to_destination_count(&self) -> usize {
        self.ground_to_destination.values().map(|v| v.len()).sum()
    }

    /// Get the number of ground edges that touched neither endpoint.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }
}
