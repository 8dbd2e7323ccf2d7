use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::customer::CustomerError;
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::ErrorBody;

/// A failed customer request: the operation it belongs to plus the domain
/// outcome. The status code comes from the error kind alone.
#[derive(Debug)]
pub struct ApiError {
    pub op: &'static str,
    pub error: CustomerError,
}

impl ApiError {
    pub fn new(op: &'static str, error: CustomerError) -> Self {
        Self { op, error }
    }

    pub fn bad_request(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, CustomerError::Validation(message.into()))
    }

    /// Malformed or missing JSON body.
    pub fn from_rejection(op: &'static str, rejection: JsonRejection) -> Self {
        Self::bad_request(op, format!("Invalid request body: {}", rejection.body_text()))
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            CustomerError::Validation(_) => StatusCode::BAD_REQUEST,
            CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomerError::Conflict(_) => StatusCode::CONFLICT,
            CustomerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.error.kind();
        if status.is_server_error() {
            error!(op = self.op, kind, status = status.as_u16(), error = %self.error, "customer request failed");
        } else {
            warn!(op = self.op, kind, status = status.as_u16(), error = %self.error, "customer request rejected");
        }
        common::metrics::record_request(self.op, kind);
        (status, Json(ErrorBody::new(self.error.message()))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store connection failed: {0}")]
    Store(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        let cases = [
            (CustomerError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CustomerError::not_found(), StatusCode::NOT_FOUND),
            (CustomerError::email_taken(), StatusCode::CONFLICT),
            (CustomerError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::new("test", err).status(), expected);
        }
    }

    #[test]
    fn message_text_does_not_pick_the_status() {
        // A validation error mentioning "not found" is still a 400.
        let err = ApiError::bad_request("test", "referenced customer not found");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
