//! Rows and row sources

use super::error::RowSourceError;

/// Text emitted in place of a database null
pub const NULL_SENTINEL: &str = "NULL";

/// One fetched row: ordered column/value pairs, `None` being a database null
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell (builder style)
    pub fn cell(mut self, column: impl Into<String>, value: Option<&str>) -> Self {
        self.push(column, value.map(str::to_string));
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.push((column.into(), value));
    }

    /// Text of `column`, with nulls read as [`NULL_SENTINEL`].
    /// Returns `None` when the row has no such column.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_deref().unwrap_or(NULL_SENTINEL))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Pull-style access to a query's result set
pub trait RowSource {
    /// Column names in result set order
    fn columns(&self) -> &[String];

    /// Next row, or `None` once the result set is exhausted
    fn next_row(&mut self) -> Result<Option<Row>, RowSourceError>;
}

/// A result set already read into memory
#[derive(Debug, Clone)]
pub struct FetchedRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Row>,
}

impl FetchedRows {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }

    /// Rows not yet consumed
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for FetchedRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>, RowSourceError> {
        Ok(self.rows.next())
    }
}
