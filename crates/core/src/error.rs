use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Every variant is recoverable and user-actionable; none is fatal to the
/// process. The API layer maps each variant to a distinct HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A stage advance was attempted before every sub-event was resolved.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// An already-decided field was decided again, or an operation was
    /// attempted in a stage that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
