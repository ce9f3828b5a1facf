//! Database error types

use thiserror::Error;

/// Errors raised while talking to the backing database
#[derive(Error, Debug)]
pub enum DbError {
    /// The pool could not be set up from the configured DSN
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// The statement was rejected or the connection failed mid-query
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
