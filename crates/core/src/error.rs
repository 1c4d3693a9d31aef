//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Errors produced by domain operations.
///
/// The HTTP layer (`breezy-api`) maps each variant to a status code and a
/// JSON error body; nothing here knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity was looked up by id and does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated or presented invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An unexpected internal failure. The message is logged, not exposed.
    #[error("Internal error: {0}")]
    Internal(String),
}
