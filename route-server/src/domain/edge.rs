//! Schedule edges: one transportation between two locations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DomainError, Location, LocationId, OperatingDays, Weekday};

/// Identifier of a stored transportation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an edge is travelled.
///
/// `Flight` is the only long-haul mode; the rest are ground transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Flight,
    Bus,
    Subway,
    Uber,
}

impl TransportMode {
    /// Returns true for bus, subway and ride-hail.
    pub fn is_ground(self) -> bool {
        match self {
            TransportMode::Flight => false,
            TransportMode::Bus | TransportMode::Subway | TransportMode::Uber => true,
        }
    }

    pub fn is_flight(self) -> bool {
        !self.is_ground()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Flight => "FLIGHT",
            TransportMode::Bus => "BUS",
            TransportMode::Subway => "SUBWAY",
            TransportMode::Uber => "UBER",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled transportation between two locations on fixed weekdays.
///
/// Carries full snapshots of both endpoint locations so route computation
/// never has to look them up.
///
/// # Invariants
///
/// - Origin and destination are different locations
/// - Operates on at least one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEdge {
    id: EdgeId,
    origin: Location,
    destination: Location,
    mode: TransportMode,
    operating_days: OperatingDays,
}

impl ScheduleEdge {
    /// Creates an edge, rejecting a self-loop.
    pub fn new(
        id: EdgeId,
        origin: Location,
        destination: Location,
        mode: TransportMode,
        operating_days: OperatingDays,
    ) -> Result<Self, DomainError> {
        if origin.id == destination.id {
            return Err(DomainError::SameEndpoints);
        }

        Ok(Self {
            id,
            origin,
            destination,
            mode,
            operating_days,
        })
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn origin(&self) -> &Location {
        &self.origin
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn operating_days(&self) -> &OperatingDays {
        &self.operating_days
    }

    pub fn is_flight(&self) -> bool {
        self.mode.is_flight()
    }

    pub fn is_ground(&self) -> bool {
        self.mode.is_ground()
    }

    /// Whether this edge runs on the given weekday.
    pub fn is_active_on(&self, day: Weekday) -> bool {
        self.operating_days.contains(day)
    }
}

/// Validated field values for creating or updating a transportation.
///
/// Endpoints are referenced by id; the store resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDraft {
    pub origin: LocationId,
    pub destination: LocationId,
    pub mode: TransportMode,
    pub operating_days: OperatingDays,
}

impl EdgeDraft {
    pub fn new(
        origin: LocationId,
        destination: LocationId,
        mode: TransportMode,
        operating_days: OperatingDays,
    ) -> Result<Self, DomainError> {
        if origin == destination {
            return Err(DomainError::SameEndpoints);
        }

        Ok(Self {
            origin,
            destination,
            mode,
            operating_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationDraft;

    fn location(id: i64, code: &str) -> Location {
        LocationDraft::new(code, "Country", "City", code)
            .unwrap()
            .into_location(LocationId(id))
    }

    #[test]
    fn mode_classification() {
        assert!(TransportMode::Flight.is_flight());
        assert!(!TransportMode::Flight.is_ground());
        for mode in [TransportMode::Bus, TransportMode::Subway, TransportMode::Uber] {
            assert!(mode.is_ground());
            assert!(!mode.is_flight());
        }
    }

    #[test]
    fn mode_json_names() {
        assert_eq!(
            serde_json::to_string(&TransportMode::Subway).unwrap(),
            "\"SUBWAY\""
        );
        let mode: TransportMode = serde_json::from_str("\"UBER\"").unwrap();
        assert_eq!(mode, TransportMode::Uber);
        assert_eq!(TransportMode::Flight.to_string(), "FLIGHT");
    }

    #[test]
    fn edge_rejects_self_loop() {
        let ist = location(1, "IST");
        let result = ScheduleEdge::new(
            EdgeId(1),
            ist.clone(),
            ist,
            TransportMode::Bus,
            OperatingDays::every_day(),
        );
        assert_eq!(result, Err(DomainError::SameEndpoints));
    }

    #[test]
    fn edge_activity_follows_operating_days() {
        let edge = ScheduleEdge::new(
            EdgeId(7),
            location(1, "IST"),
            location(2, "LHR"),
            TransportMode::Flight,
            OperatingDays::from_numbers(&[1, 3, 5]).unwrap(),
        )
        .unwrap();

        assert!(edge.is_active_on(Weekday::MONDAY));
        assert!(!edge.is_active_on(Weekday::TUESDAY));
        assert!(edge.is_flight());
        assert_eq!(edge.origin().code.as_str(), "IST");
        assert_eq!(edge.destination().code.as_str(), "LHR");
    }

    #[test]
    fn draft_rejects_same_endpoints() {
        let result = EdgeDraft::new(
            LocationId(4),
            LocationId(4),
            TransportMode::Uber,
            OperatingDays::every_day(),
        );
        assert_eq!(result, Err(DomainError::SameEndpoints));
    }
}
