//! Weekday encoding and operating-day sets.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Error returned when a weekday number is outside 1..=7.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid weekday {value}: must be between 1 and 7")]
pub struct InvalidWeekday {
    value: u8,
}

/// An ISO weekday: 1 (Monday) through 7 (Sunday).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use route_server::domain::Weekday;
///
/// let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// assert_eq!(Weekday::from_date(monday), Weekday::MONDAY);
/// assert_eq!(Weekday::MONDAY.number(), 1);
///
/// assert!(Weekday::new(0).is_err());
/// assert!(Weekday::new(8).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    pub const MONDAY: Weekday = Weekday(1);
    pub const TUESDAY: Weekday = Weekday(2);
    pub const WEDNESDAY: Weekday = Weekday(3);
    pub const THURSDAY: Weekday = Weekday(4);
    pub const FRIDAY: Weekday = Weekday(5);
    pub const SATURDAY: Weekday = Weekday(6);
    pub const SUNDAY: Weekday = Weekday(7);

    /// Create a weekday from its ISO number.
    pub fn new(value: u8) -> Result<Self, InvalidWeekday> {
        if (1..=7).contains(&value) {
            Ok(Weekday(value))
        } else {
            Err(InvalidWeekday { value })
        }
    }

    /// The weekday a calendar date falls on.
    pub fn from_date(date: NaiveDate) -> Self {
        // number_from_monday is always 1..=7
        Weekday(date.weekday().number_from_monday() as u8)
    }

    /// The ISO number of this weekday.
    pub fn number(self) -> u8 {
        self.0
    }

    /// All seven weekdays, Monday first.
    pub fn all() -> impl Iterator<Item = Weekday> {
        (1..=7).map(Weekday)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = InvalidWeekday;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::new(value)
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.0
    }
}

impl fmt::Debug for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weekday({})", self.0)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The non-empty set of weekdays a schedule edge operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct OperatingDays(BTreeSet<Weekday>);

impl OperatingDays {
    /// Build a set from weekdays. Duplicates collapse; an empty set is rejected.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Result<Self, DomainError> {
        let set: BTreeSet<Weekday> = days.into_iter().collect();
        if set.is_empty() {
            return Err(DomainError::NoOperatingDays);
        }
        Ok(Self(set))
    }

    /// Build a set from ISO numbers, rejecting anything outside 1..=7.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, DomainError> {
        let days = numbers
            .iter()
            .map(|&n| Weekday::new(n))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }

    /// Every day of the week.
    pub fn every_day() -> Self {
        Self(Weekday::all().collect())
    }

    /// Whether the edge runs on the given day.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for OperatingDays {
    type Error = DomainError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        OperatingDays::from_numbers(&value)
    }
}

impl From<OperatingDays> for Vec<u8> {
    fn from(days: OperatingDays) -> Self {
        days.iter().map(Weekday::number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_date_uses_iso_numbering() {
        // 2025-03-10 is a Monday
        assert_eq!(Weekday::from_date(date(2025, 3, 10)), Weekday::MONDAY);
        assert_eq!(Weekday::from_date(date(2025, 3, 11)), Weekday::TUESDAY);
        assert_eq!(Weekday::from_date(date(2025, 3, 16)), Weekday::SUNDAY);
        assert_eq!(Weekday::SUNDAY.number(), 7);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Weekday::new(0).is_err());
        assert!(Weekday::new(8).is_err());
        assert!(Weekday::new(255).is_err());
        assert_eq!(Weekday::new(3), Ok(Weekday::WEDNESDAY));
    }

    #[test]
    fn all_yields_seven_days_in_order() {
        let numbers: Vec<u8> = Weekday::all().map(Weekday::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn operating_days_rejects_empty() {
        assert_eq!(
            OperatingDays::new(Vec::new()),
            Err(DomainError::NoOperatingDays)
        );
        assert_eq!(
            OperatingDays::from_numbers(&[]),
            Err(DomainError::NoOperatingDays)
        );
    }

    #[test]
    fn operating_days_rejects_out_of_range() {
        assert!(matches!(
            OperatingDays::from_numbers(&[1, 2, 9]),
            Err(DomainError::Weekday(_))
        ));
    }

    #[test]
    fn operating_days_sorts_and_dedups() {
        let days = OperatingDays::from_numbers(&[5, 1, 3, 1]).unwrap();
        let numbers: Vec<u8> = days.into();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn operating_days_contains() {
        let days = OperatingDays::from_numbers(&[2, 4, 6]).unwrap();
        assert!(days.contains(Weekday::TUESDAY));
        assert!(!days.contains(Weekday::MONDAY));
        assert!(OperatingDays::every_day().contains(Weekday::SUNDAY));
        assert_eq!(OperatingDays::every_day().len(), 7);
    }

    #[test]
    fn operating_days_json() {
        let days: OperatingDays = serde_json::from_str("[7,1,3]").unwrap();
        assert_eq!(serde_json::to_string(&days).unwrap(), "[1,3,7]");
        assert!(serde_json::from_str::<OperatingDays>("[]").is_err());
        assert!(serde_json::from_str::<OperatingDays>("[0]").is_err());
    }
}
