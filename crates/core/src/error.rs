use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("No recipe is published under short code {0:?}")]
    UnknownShortCode(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Field-level validation failures, collected before returning.
    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(FieldErrors),

    /// The `(user, target)` pair is already present in a relation.
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The `(user, target)` pair is absent from a relation.
    #[error("Missing entry: {0}")]
    MissingEntry(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
