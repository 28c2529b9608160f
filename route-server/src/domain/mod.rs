//! Domain types for the route planner.
//!
//! This module contains the core domain model types: locations, schedule
//! edges and the itineraries composed from them. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod edge;
mod error;
mod itinerary;
mod location;
mod weekday;

pub use edge::{EdgeDraft, EdgeId, ScheduleEdge, TransportMode};
pub use error::DomainError;
pub use itinerary::{Itinerary, Segment, SegmentKind};
pub use location::{InvalidLocationCode, Location, LocationCode, LocationDraft, LocationId};
pub use weekday::{InvalidWeekday, OperatingDays, Weekday};
