//! Itinerary types.
//!
//! An `Itinerary` is one way of getting from the requested origin to the
//! requested destination: a single flight, optionally preceded and/or followed
//! by one ground transfer.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DomainError, EdgeId, Location, ScheduleEdge, TransportMode};

/// The role a schedule edge plays inside one itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentKind {
    BeforeFlight,
    Flight,
    AfterFlight,
}

impl SegmentKind {
    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            SegmentKind::BeforeFlight => "Before Flight Transfer",
            SegmentKind::Flight => "Flight",
            SegmentKind::AfterFlight => "After Flight Transfer",
        }
    }

    /// Position within an itinerary; kinds must appear in strictly increasing order.
    fn position(self) -> u8 {
        match self {
            SegmentKind::BeforeFlight => 0,
            SegmentKind::Flight => 1,
            SegmentKind::AfterFlight => 2,
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One traversal of a schedule edge within an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub edge_id: EdgeId,
    pub mode: TransportMode,
    pub kind: SegmentKind,
    pub from: Location,
    pub to: Location,
}

impl Segment {
    /// Snapshot an edge in the given role.
    pub fn new(edge: &ScheduleEdge, kind: SegmentKind) -> Self {
        Self {
            edge_id: edge.id(),
            mode: edge.mode(),
            kind,
            from: edge.origin().clone(),
            to: edge.destination().clone(),
        }
    }

    pub fn before_flight(edge: &ScheduleEdge) -> Self {
        Self::new(edge, SegmentKind::BeforeFlight)
    }

    pub fn flight(edge: &ScheduleEdge) -> Self {
        Self::new(edge, SegmentKind::Flight)
    }

    pub fn after_flight(edge: &ScheduleEdge) -> Self {
        Self::new(edge, SegmentKind::AfterFlight)
    }

    /// A flight segment must use the flight mode; transfers must be ground modes.
    fn mode_matches_kind(&self) -> bool {
        match self.kind {
            SegmentKind::Flight => self.mode.is_flight(),
            SegmentKind::BeforeFlight | SegmentKind::AfterFlight => self.mode.is_ground(),
        }
    }
}

/// A complete travel plan of one to three segments.
///
/// # Invariants
///
/// - Exactly one `Flight` segment
/// - Kinds appear in `BeforeFlight`, `Flight`, `AfterFlight` order, each at most once
/// - Segment kinds agree with transport modes
/// - Consecutive segments connect (destination of one = origin of next)
///
/// Deserialization goes through [`Itinerary::new`], so decoded values hold
/// the same invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawItinerary")]
pub struct Itinerary {
    segments: Vec<Segment>,
}

/// Unchecked wire form of an [`Itinerary`].
#[derive(Deserialize)]
struct RawItinerary {
    segments: Vec<Segment>,
}

impl TryFrom<RawItinerary> for Itinerary {
    type Error = DomainError;

    fn try_from(raw: RawItinerary) -> Result<Self, Self::Error> {
        Itinerary::new(raw.segments)
    }
}

impl Itinerary {
    /// Constructs an itinerary from segments in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any invariant listed on the type does not hold.
    pub fn new(segments: Vec<Segment>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::InvalidItinerary(
                "must have at least one segment",
            ));
        }

        let flights = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Flight)
            .count();
        if flights != 1 {
            return Err(DomainError::InvalidItinerary(
                "exactly one flight segment required",
            ));
        }

        if segments.iter().any(|s| !s.mode_matches_kind()) {
            return Err(DomainError::InvalidItinerary(
                "segment kind does not match transport mode",
            ));
        }

        for window in segments.windows(2) {
            if window[0].kind.position() >= window[1].kind.position() {
                return Err(DomainError::InvalidItinerary("segments out of order"));
            }
            if window[0].to.id != window[1].from.id {
                return Err(DomainError::InvalidItinerary(
                    "consecutive segments do not connect",
                ));
            }
        }

        Ok(Itinerary { segments })
    }

    /// Returns all segments in travel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the flight segment.
    pub fn flight(&self) -> &Segment {
        // The flight is first unless a transfer precedes it
        let at = usize::from(self.segments[0].kind == SegmentKind::BeforeFlight);
        &self.segments[at]
    }

    /// Returns the ground transfer before the flight, if any.
    pub fn before_flight(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.kind == SegmentKind::BeforeFlight)
    }

    /// Returns the ground transfer after the flight, if any.
    pub fn after_flight(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.kind == SegmentKind::AfterFlight)
    }

    /// Where the itinerary starts.
    pub fn origin(&self) -> &Location {
        &self.segments[0].from
    }

    /// Where the itinerary ends.
    pub fn destination(&self) -> &Location {
        &self.segments[self.segments.len() - 1].to
    }
}
