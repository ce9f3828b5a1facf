//! Database Execution
//!
//! Runs translated SQL against MySQL or PostgreSQL and reads the result set
//! back as text.
//!
//! Statements are sent unprepared, which puts both drivers on their text
//! protocol: every value arrives in its textual form (or as a null), whatever
//! its column type. The shaper does its own numeric coercion on that text.
//!
//! Rows are read fully before shaping starts. A failure part-way through the
//! stream discards whatever was already read, and dropping the future (a
//! timed-out or abandoned request) stops consumption of the stream.

mod error;

pub use error::{DbError, DbResult};

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, ColumnIndex, Decode, Executor};

use crate::config::DatabaseConfig;
use crate::shape::{FetchedRows, Row};
use crate::translate::Dialect;

/// Executes SQL and hands back its result set
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn fetch(&self, sql: &str) -> DbResult<FetchedRows>;
}

/// Connection pool for the configured backend
#[derive(Debug, Clone)]
pub enum Database {
    MySql(MySqlPool),
    Postgres(PgPool),
}

impl Database {
    /// Build a pool for `config`.
    ///
    /// Connections are opened on first use, so a database that is down at
    /// startup surfaces as query failures rather than a startup error. Only a
    /// malformed DSN fails here.
    pub fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let database = match config.driver {
            Dialect::MySql => MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_lazy(&config.dsn)
                .map(Database::MySql),
            Dialect::Postgres => PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_lazy(&config.dsn)
                .map(Database::Postgres),
        }
        .map_err(DbError::Connect)?;

        tracing::info!(driver = %config.driver, "Database pool configured");
        Ok(database)
    }

    /// Dialect of the connected backend
    pub fn dialect(&self) -> Dialect {
        match self {
            Database::MySql(_) => Dialect::MySql,
            Database::Postgres(_) => Dialect::Postgres,
        }
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        match self {
            Database::MySql(pool) => pool.close().await,
            Database::Postgres(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl QueryBackend for Database {
    async fn fetch(&self, sql: &str) -> DbResult<FetchedRows> {
        let (columns, rows) = match self {
            Database::MySql(pool) => {
                let rows: Vec<MySqlRow> = pool.fetch(sql).try_collect().await?;
                let columns = match rows.first() {
                    Some(first) => column_names(sqlx::Row::columns(first)),
                    None => column_names(pool.describe(sql).await?.columns()),
                };
                (columns, text_rows(&rows)?)
            }
            Database::Postgres(pool) => {
                let rows: Vec<PgRow> = pool.fetch(sql).try_collect().await?;
                let columns = match rows.first() {
                    Some(first) => column_names(sqlx::Row::columns(first)),
                    None => column_names(pool.describe(sql).await?.columns()),
                };
                (columns, text_rows(&rows)?)
            }
        };

        tracing::debug!(columns = columns.len(), rows = rows.len(), "Fetched result set");
        Ok(FetchedRows::new(columns, rows))
    }
}

fn column_names<C: Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

/// Read every cell as text, keeping result set column order.
fn text_rows<R>(rows: &[R]) -> DbResult<Vec<Row>>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    for<'r> Option<String>: Decode<'r, R::Database>,
{
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut text_row = Row::new();
        for (i, column) in row.columns().iter().enumerate() {
            // Unchecked: text-protocol values decode as text whatever their declared type.
            let value: Option<String> = row.try_get_unchecked(i)?;
            text_row.push(column.name(), value);
        }
        out.push(text_row);
    }
    Ok(out)
}
