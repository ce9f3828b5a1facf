//! Shaping error types

use thiserror::Error;

/// Failure reported by a row source while iterating
#[derive(Error, Debug)]
pub enum RowSourceError {
    /// Reading the next row failed
    #[error("Row fetch failed: {0}")]
    Fetch(String),
}

/// Errors that can occur while shaping rows into a result tree
#[derive(Error, Debug)]
pub enum ShapeError {
    /// The result set declares no columns
    #[error("Result set has no columns")]
    EmptySchema,

    /// The result set has no `time` column to index values by
    #[error("Result set has no `time` column")]
    MissingTimeColumn,

    /// A row's `time` value is not an unsigned integer
    #[error("Row {row}: time value {value:?} is not an unsigned integer")]
    InvalidTime { row: usize, value: String },

    /// The row source failed mid-iteration
    #[error(transparent)]
    Source(#[from] RowSourceError),
}

/// Result type for shaping operations
pub type ShapeResult<T> = Result<T, ShapeError>;
