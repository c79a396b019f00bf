//! Error types for the Larder system.

use thiserror::Error;

use crate::models::order::{OrderAction, OrderStatus};

#[derive(Debug, Error)]
pub enum LarderError {
    /// Malformed or missing input; the caller can correct it and retry.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Absent, or owned by another tenant. The two cases are
    /// indistinguishable on purpose.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid transition: cannot {action} an order in status {status}")]
    InvalidTransition {
        status: OrderStatus,
        action: OrderAction,
    },

    /// An optimistic write lost against a concurrent modification.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    /// A bounded store call did not complete in time. Safe to retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LarderError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether the caller can recover by correcting input or re-fetching.
    ///
    /// Only the four core classes qualify: `Validation`, `NotFound`,
    /// `InvalidTransition` and `Conflict`.
    pub fn is_client_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::InvalidTransition { .. }
                | Self::Conflict { .. }
        )
    }
}

pub type LarderResult<T> = Result<T, LarderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{OrderAction, OrderStatus};

    #[test]
    fn only_core_classes_are_client_recoverable() {
        let recoverable = [
            LarderError::validation("bad"),
            LarderError::not_found("order", "1"),
            LarderError::InvalidTransition {
                status: OrderStatus::Draft,
                action: OrderAction::Confirm,
            },
            LarderError::Conflict {
                message: "stale".into(),
            },
        ];
        for err in &recoverable {
            assert!(err.is_client_recoverable(), "{err:?}");
        }

        let other = [
            LarderError::AlreadyExists {
                entity: "product".into(),
            },
            LarderError::Unauthenticated {
                reason: "no token".into(),
            },
            LarderError::Unavailable("timeout".into()),
            LarderError::Database("down".into()),
            LarderError::Internal("bug".into()),
        ];
        for err in &other {
            assert!(!err.is_client_recoverable(), "{err:?}");
        }
    }
}
