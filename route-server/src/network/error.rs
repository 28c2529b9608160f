//! Store error types.

use crate::domain::DomainError;

/// Errors from the network store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record with this id
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// The write would break a store-level constraint
    #[error("{0}")]
    Conflict(String),

    /// Draft failed validation
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// The backing store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn location_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: "location",
            id,
        }
    }

    pub fn transportation_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: "transportation",
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            StoreError::location_not_found(4).to_string(),
            "location not found with id: 4"
        );
        assert_eq!(
            StoreError::from(DomainError::SameEndpoints).to_string(),
            "origin and destination must be different locations"
        );
    }
}
