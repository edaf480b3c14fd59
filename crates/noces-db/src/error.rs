//! Database error types for noces-db.

use noces_core::errors::CoreError;
use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The document does not exist, or is not visible to the current identity.
    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: String },

    /// The current identity may not perform this operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Document data violates an invariant. Nothing was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A status change not allowed by the entity's state machine.
    #[error("Invalid state transition: {entity} {id} from {from} to {to}")]
    InvalidTransition {
        entity: String,
        id: String,
        from: String,
        to: String,
    },

    /// Malformed field path, operator, or operand.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Document JSON could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(collection: impl ToString, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.into(),
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound { entity_type, id } => Self::NotFound {
                collection: entity_type,
                id,
            },
            CoreError::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            } => Self::InvalidTransition {
                entity: entity_type,
                id,
                from,
                to,
            },
            CoreError::Validation(message) => Self::Validation(message),
            error @ CoreError::InvalidAmount { .. } => Self::Validation(error.to_string()),
            CoreError::Other(error) => Self::Other(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_validation_maps_to_validation() {
        let err: DatabaseError = CoreError::Validation("amount must be positive".into()).into();
        assert!(matches!(err, DatabaseError::Validation(ref m) if m == "amount must be positive"));
    }

    #[test]
    fn core_transition_keeps_fields() {
        let err: DatabaseError = CoreError::InvalidTransition {
            entity_type: "invoice".into(),
            id: "inv-1".into(),
            from: "paid".into(),
            to: "draft".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: invoice inv-1 from paid to draft"
        );
    }
}
