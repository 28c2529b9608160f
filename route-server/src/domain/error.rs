//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from store, cache and HTTP errors.

use super::{InvalidLocationCode, InvalidWeekday};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Location code failed validation
    #[error(transparent)]
    LocationCode(#[from] InvalidLocationCode),

    /// Weekday number outside 1..=7
    #[error(transparent)]
    Weekday(#[from] InvalidWeekday),

    /// A required text field is empty or whitespace
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    /// A schedule edge must operate on at least one day
    #[error("operating days must not be empty")]
    NoOperatingDays,

    /// A schedule edge must connect two different locations
    #[error("origin and destination must be different locations")]
    SameEndpoints,

    /// Segments do not form a single-flight itinerary
    #[error("invalid itinerary: {0}")]
    InvalidItinerary(&'static str),
}
