use crate::types::DbId;

/// Domain-level error type shared across the workspace.
///
/// The three user-visible failure families stay distinct variants so the
/// HTTP layer can answer "out of free attempts" ([`CoreError::QuotaExceeded`]),
/// "no content right now" ([`CoreError::NoContentAvailable`]) and "something
/// went wrong" ([`CoreError::Internal`]) with different codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Free practice limit reached ({used} of {limit} sessions used)")]
    QuotaExceeded { used: i32, limit: i32 },

    #[error("No practice content is currently available")]
    NoContentAvailable,

    #[error("Internal error: {0}")]
    Internal(String),
}
