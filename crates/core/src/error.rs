//! Failures raised by marketplace entities and stores.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// What went wrong below the HTTP layer.
///
/// Access control is not represented here: denials come from the policy
/// engine in `marketplace-auth`. The API maps each variant onto one status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rejected input: empty names, zero prices, stars outside 1..=5, bad price ranges.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Well-formed input that breaks a catalog or order rule, such as a
    /// product placed in a base category or a seller buying their own listing.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Path or body text that does not parse as a numeric id.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    /// Duplicate slug, second rating of the same product, or an order sent twice.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        assert_eq!(
            DomainError::validation("price must be positive").to_string(),
            "validation failed: price must be positive"
        );
        assert_eq!(DomainError::conflict("slug taken").to_string(), "conflict: slug taken");
        assert_eq!(DomainError::NotFound.to_string(), "not found");
    }
}
