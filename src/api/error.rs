//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.
//!
//! Bodies are fixed plain-text status lines; detail only goes to the log.
//! CORS headers are added by the router, not here.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::DbError;
use crate::shape::ShapeError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// `u`/`p` did not match the configured credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// The database rejected the translated statement or could not be reached
    #[error("Query execution failed: {source}")]
    QueryExecution {
        query: String,
        #[source]
        source: DbError,
    },

    /// A row could not be coerced into the result tree
    #[error("Row coercion failed: {0}")]
    RowCoercion(#[from] ShapeError),

    /// The result tree could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::QueryExecution { .. }
            | ApiError::RowCoercion(_)
            | ApiError::Serialization(_)
            | ApiError::Internal(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let request_id = uuid::Uuid::new_v4().to_string();

        match &self {
            // Already logged with the offending user at the call site.
            ApiError::Unauthorized => {}
            ApiError::QueryExecution { query, source } => tracing::error!(
                request_id = %request_id,
                query = %query,
                error = %source,
                "Query error"
            ),
            _ => tracing::error!(
                request_id = %request_id,
                error_message = %self,
                "API error occurred"
            ),
        }

        let body = match self {
            ApiError::Unauthorized => "401 Unauthorized",
            _ => "500 Internal Server Error",
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
