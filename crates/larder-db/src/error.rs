//! Database-specific error types and conversions.

use larder_core::error::LarderError;
use tracing::error;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated on {entity}")]
    Duplicate { entity: String },

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Stored record is malformed: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Classify a failed statement from `Response::check`.
    pub(crate) fn statement(entity: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate {
                entity: entity.to_string(),
            }
        } else if is_conflict(&message) {
            DbError::Conflict(message)
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn corrupt(what: &str, err: impl std::fmt::Display) -> Self {
        DbError::Corrupt(format!("{what}: {err}"))
    }
}

/// Transaction conflicts surface as plain errors from the engine.
fn is_conflict(message: &str) -> bool {
    message.to_ascii_lowercase().contains("conflict")
}

impl From<DbError> for LarderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LarderError::NotFound { entity, id },
            DbError::Duplicate { entity } => LarderError::AlreadyExists { entity },
            DbError::Conflict(message) => LarderError::Conflict { message },
            DbError::Surreal(e) if is_conflict(&e.to_string()) => LarderError::Conflict {
                message: "concurrent modification, re-fetch and retry".into(),
            },
            other => {
                error!(error = %other, "database failure");
                LarderError::Database(other.to_string())
            }
        }
    }
}
