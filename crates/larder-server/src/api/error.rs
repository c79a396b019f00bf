//! Problem-detail error responses.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use larder_core::error::LarderError;
use larder_core::lifecycle::allowed_actions;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Body shape of every error response.
#[derive(Debug, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
}

/// Handler error: a [`LarderError`] rendered as a problem document.
#[derive(Debug)]
pub struct ApiError(pub LarderError);

impl From<LarderError> for ApiError {
    fn from(err: LarderError) -> Self {
        Self(err)
    }
}

impl From<larder_auth::AuthError> for ApiError {
    fn from(err: larder_auth::AuthError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(LarderError::validation(message))
    }

    fn parts(&self) -> (StatusCode, &'static str, &'static str, String) {
        match &self.0 {
            LarderError::Validation { message } => (
                StatusCode::BAD_REQUEST,
                "validation",
                "Validation failed",
                message.clone(),
            ),
            LarderError::Unauthenticated { reason } => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication failed",
                reason.clone(),
            ),
            LarderError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "not-found",
                "Not found",
                format!("{entity} {id} not found"),
            ),
            LarderError::InvalidTransition { status, action } => {
                let allowed: Vec<_> = allowed_actions(*status)
                    .into_iter()
                    .map(|a| a.as_str())
                    .collect();
                let hint = if allowed.is_empty() {
                    format!("{status} is terminal")
                } else {
                    format!("allowed actions: {}", allowed.join(", "))
                };
                (
                    StatusCode::CONFLICT,
                    "invalid-transition",
                    "Invalid state transition",
                    format!("cannot {action} an order in status {status}; {hint}"),
                )
            }
            LarderError::Conflict { message } => (
                StatusCode::CONFLICT,
                "conflict",
                "Concurrent modification",
                message.clone(),
            ),
            LarderError::AlreadyExists { entity } => (
                StatusCode::CONFLICT,
                "duplicate",
                "Duplicate entry",
                format!("{entity} already exists"),
            ),
            LarderError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                "Service unavailable",
                message.clone(),
            ),
            LarderError::Database(_) | LarderError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "Internal error",
                "an unexpected error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, slug, title, detail) = self.parts();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        } else if self.0.is_client_recoverable() {
            debug!(error = %self.0, status = status.as_u16(), "request rejected");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        let problem = Problem {
            kind: format!("urn:larder:problem:{slug}"),
            title,
            status: status.as_u16(),
            detail,
        };
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use larder_core::models::order::{OrderAction, OrderStatus};

    use super::*;

    fn status_of(err: LarderError) -> StatusCode {
        ApiError(err).parts().0
    }

    #[test]
    fn error_classes_map_to_statuses() {
        assert_eq!(status_of(LarderError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LarderError::Unauthenticated { reason: "x".into() }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(LarderError::not_found("order", "1")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(LarderError::InvalidTransition {
                status: OrderStatus::Draft,
                action: OrderAction::Confirm,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LarderError::Conflict { message: "x".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LarderError::AlreadyExists { entity: "product".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LarderError::Unavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn database_details_are_not_exposed() {
        let (status, _, _, detail) =
            ApiError(LarderError::Database("index idx_secret corrupted".into())).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!detail.contains("idx_secret"));
    }

    #[test]
    fn invalid_transition_lists_allowed_actions() {
        let (_, _, _, detail) = ApiError(LarderError::InvalidTransition {
            status: OrderStatus::Pending,
            action: OrderAction::Complete,
        })
        .parts();
        assert!(detail.contains("confirm, cancel"), "{detail}");

        let (_, _, _, detail) = ApiError(LarderError::InvalidTransition {
            status: OrderStatus::Cancelled,
            action: OrderAction::Submit,
        })
        .parts();
        assert!(detail.contains("terminal"), "{detail}");
    }
}
