//! Location types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Identifier of a stored location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an invalid location code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location code: {reason}")]
pub struct InvalidLocationCode {
    reason: &'static str,
}

/// A short location code such as `IST` or `CCIST`.
///
/// Codes are trimmed, contain no whitespace and are at least three characters
/// long. Uniqueness across locations is the store's concern, not this type's.
///
/// # Examples
///
/// ```
/// use route_server::domain::LocationCode;
///
/// let ist = LocationCode::parse(" IST ").unwrap();
/// assert_eq!(ist.as_str(), "IST");
///
/// assert!(LocationCode::parse("IS").is_err());
/// assert!(LocationCode::parse("IS T").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationCode(String);

impl LocationCode {
    /// Parse a location code, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidLocationCode> {
        let trimmed = s.trim();

        if trimmed.chars().count() < 3 {
            return Err(InvalidLocationCode {
                reason: "must be at least 3 characters",
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidLocationCode {
                reason: "must not contain whitespace",
            });
        }

        Ok(LocationCode(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationCode {
    type Error = InvalidLocationCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocationCode::parse(&value)
    }
}

impl From<LocationCode> for String {
    fn from(code: LocationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationCode({})", self.0)
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named place that schedule edges connect: an airport, a square, a stadium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub country: String,
    pub city: String,
    #[serde(rename = "locationCode")]
    pub code: LocationCode,
}

/// Validated field values for creating or updating a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    pub name: String,
    pub country: String,
    pub city: String,
    pub code: LocationCode,
}

impl LocationDraft {
    /// Validate raw field values.
    ///
    /// Text fields are trimmed and must not be blank.
    pub fn new(name: &str, country: &str, city: &str, code: &str) -> Result<Self, DomainError> {
        Ok(Self {
            name: non_blank(name, "name")?,
            country: non_blank(country, "country")?,
            city: non_blank(city, "city")?,
            code: LocationCode::parse(code)?,
        })
    }

    /// Attach an identifier, producing a stored location.
    pub fn into_location(self, id: LocationId) -> Location {
        Location {
            id,
            name: self.name,
            country: self.country,
            city: self.city,
            code: self.code,
        }
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
