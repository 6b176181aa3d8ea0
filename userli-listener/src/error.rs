//! Error types for the webhook pipeline.
//!
//! Two families exist:
//! - [`WebhookError`]: surfaced to the webhook caller as 4xx responses
//! - [`BackendError`]: absorbed by the dispatcher and only logged

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::Backend;

/// Errors that are visible to the webhook caller.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("missing signature header")]
    AuthenticationMissing,

    #[error("invalid signature")]
    AuthenticationInvalid,

    #[error("invalid request body: {0}")]
    MalformedPayload(String),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::AuthenticationMissing | WebhookError::AuthenticationInvalid => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::MalformedPayload(_) | WebhookError::UnknownEventType(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            WebhookError::AuthenticationMissing | WebhookError::AuthenticationInvalid => {
                "unauthorized"
            }
            WebhookError::MalformedPayload(_) => "malformed_payload",
            WebhookError::UnknownEventType(_) => "unknown_event_type",
        }
    }
}

/// JSON error body returned by the ingress endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: self.kind(),
            error: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Errors raised while talking to a downstream identity backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("{backend}: domain not allowed: {domain}")]
    DomainNotAllowed { backend: Backend, domain: String },

    #[error("{backend}: failed to build request url: {reason}")]
    InvalidUrl { backend: Backend, reason: String },

    #[error("{backend}: request failed: {source}")]
    Transport {
        backend: Backend,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend}: unexpected status code {status}")]
    UnexpectedStatus { backend: Backend, status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebhookError::AuthenticationMissing.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::AuthenticationInvalid.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::MalformedPayload("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::UnknownEventType("user.renamed".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_backend_error_names_backend() {
        let err = BackendError::UnexpectedStatus {
            backend: Backend::Nextcloud,
            status: 500,
        };
        assert_eq!(err.to_string(), "nextcloud: unexpected status code 500");
    }
}
