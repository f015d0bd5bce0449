//! HTTP error types for the `Atrium` proxy.
//!
//! Every failure a handler can produce is a [`ProxyError`] variant. Each one
//! maps to exactly one status code and a [`ContactResponse`] body, so the
//! public surface only ever emits 200, 204, 400, 403, 405, 500, or 502.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::relay::RelayError;
use crate::validate::Rejection;

/// JSON body returned by the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Application-level error returned from the contact handler.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The request origin is missing or not allowlisted.
    #[error("Origin not allowed")]
    OriginNotAllowed,

    /// Anything other than `POST` or `OPTIONS`.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The relay credential is not configured.
    #[error("Server misconfigured")]
    Misconfigured,

    /// The body is unreadable, oversized, or not a JSON object.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// The submission failed validation.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The upstream could not be reached or answered non-2xx.
    #[error("Upstream request failed")]
    Relay(#[from] RelayError),

    /// The upstream answered but declined the submission.
    #[error("{0}")]
    SubmissionFailed(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBody | Self::Rejected(_) | Self::SubmissionFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Upstream detail stays in the logs; the client sees a fixed message.
        if let Self::Relay(ref inner) = self {
            error!(error = %inner, "relay failed");
        }

        let body = ContactResponse::failure(self.to_string());
        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
        }
        response
    }
}
