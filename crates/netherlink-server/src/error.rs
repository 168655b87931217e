//! HTTP error envelope.
//!
//! Every failing route returns `{error, message}` JSON. Upstream and storage
//! detail goes to the logs, not to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use netherlink_core::DatabaseError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::manifest::{FetchError, ResolveError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to fetch upstream data")]
    Upstream(#[source] FetchError),

    #[error("Schema out of date; restart the server to apply migrations")]
    SchemaMismatch(String),

    #[error("Internal server error")]
    Database(#[source] DatabaseError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::SchemaMismatch(detail) => Self::SchemaMismatch(detail),
            other => Self::Database(other),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Database(err) => err.into(),
            ResolveError::Fetch(err) => Self::Upstream(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Upstream(source) => {
                warn!(error = %source, "Upstream fetch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error")
            }
            Self::SchemaMismatch(detail) => {
                error!(error = %detail, "Schema mismatch");
                (StatusCode::INTERNAL_SERVER_ERROR, "schema_mismatch")
            }
            Self::Database(source) => {
                error!(error = %source, "Storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        let message = self.to_string();
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_resource() {
        let err = ApiError::from(DatabaseError::NotFound("Launcher asset acme".to_string()));
        assert_eq!(err.to_string(), "Launcher asset acme not found");
    }

    #[test]
    fn schema_mismatch_message_advises_restart() {
        let err = ApiError::from(DatabaseError::SchemaMismatch("no such column: x".to_string()));
        assert!(err.to_string().contains("restart"));
    }

    #[test]
    fn query_errors_are_sanitized() {
        let err = ApiError::from(DatabaseError::Query("secret table detail".to_string()));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
