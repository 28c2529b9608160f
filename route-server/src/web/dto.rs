//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::cache::StatsSnapshot;
use crate::domain::{
    DomainError, EdgeDraft, Itinerary, Location, LocationDraft, LocationId, OperatingDays,
    ScheduleEdge, Segment, SegmentKind, TransportMode,
};

/// Query string for route search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSearchRequest {
    pub origin_id: i64,
    pub destination_id: i64,

    /// Travel date, `YYYY-MM-DD`
    pub date: String,
}

/// Body for creating or updating a location.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub name: String,
    pub country: String,
    pub city: String,
    pub location_code: String,
}

impl LocationRequest {
    pub fn into_draft(self) -> Result<LocationDraft, DomainError> {
        LocationDraft::new(&self.name, &self.country, &self.city, &self.location_code)
    }
}

/// Body for creating or updating a transportation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationRequest {
    pub origin_location_id: i64,
    pub destination_location_id: i64,
    pub transportation_type: TransportMode,

    /// ISO weekday numbers, Monday = 1
    pub operating_days: Vec<u8>,
}

impl TransportationRequest {
    pub fn into_draft(self) -> Result<EdgeDraft, DomainError> {
        let days = OperatingDays::from_numbers(&self.operating_days)?;
        EdgeDraft::new(
            LocationId(self.origin_location_id),
            LocationId(self.destination_location_id),
            self.transportation_type,
            days,
        )
    }
}

/// A transportation in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationResult {
    pub id: i64,
    pub origin_location_id: i64,
    pub destination_location_id: i64,
    pub transportation_type: TransportMode,
    pub operating_days: Vec<u8>,
    pub origin_location: Location,
    pub destination_location: Location,
}

impl TransportationResult {
    pub fn from_edge(edge: &ScheduleEdge) -> Self {
        Self {
            id: edge.id().0,
            origin_location_id: edge.origin().id.0,
            destination_location_id: edge.destination().id.0,
            transportation_type: edge.mode(),
            operating_days: edge.operating_days().iter().map(|d| d.number()).collect(),
            origin_location: edge.origin().clone(),
            destination_location: edge.destination().clone(),
        }
    }
}

/// One segment of a route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    pub transportation_id: i64,
    #[serde(rename = "type")]
    pub mode: TransportMode,
    pub from: Location,
    pub to: Location,
    pub segment_type: SegmentKind,

    /// e.g. "Before Flight Transfer"
    pub segment_label: &'static str,
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            transportation_id: segment.edge_id.0,
            mode: segment.mode,
            from: segment.from.clone(),
            to: segment.to.clone(),
            segment_type: segment.kind,
            segment_label: segment.kind.display_name(),
        }
    }
}

/// A route in search results.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub segments: Vec<SegmentResult>,
}

impl RouteResult {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            segments: itinerary
                .segments()
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
        }
    }
}

/// Cache counters and size.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    pub entries: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
