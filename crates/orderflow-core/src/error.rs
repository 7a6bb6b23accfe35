//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced record (item, order, order line, user) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A request failed validation at the boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// A database, broker, or user-service failure other than not-found.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl DomainError {
    /// Builds the conventional not-found error for an entity and id.
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }

    /// Returns true if this error is the not-found kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
