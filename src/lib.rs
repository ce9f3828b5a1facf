//! # influxsql
//!
//! Influx-compatible query endpoint backed by a relational database.
//!
//! A query arrives in the Influx HTTP API shape, its `translateTimePart(...)`
//! call is rewritten into SQL for the configured dialect, the statement runs
//! against MySQL or PostgreSQL and the rows come back in the nested
//! `results` / `series` envelope Influx clients read.
//!
//! ## Modules
//!
//! - [`translate`]: Marker call rewriting and SQL dialects
//! - [`shape`]: Row coercion and the result tree
//! - [`db`]: Query execution against the backing database
//! - [`api`]: HTTP API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use influxsql::shape::{shape, FetchedRows, Row};
//! use influxsql::translate::{translate, Dialect};
//!
//! let sql = translate("SELECT time, v FROM t WHERE time > translateTimePart(1614556800s)", Dialect::Postgres);
//! assert_eq!(sql, "SELECT time, v FROM t WHERE time > '2021-03-01T00:00:00Z'");
//!
//! let mut rows = FetchedRows::new(
//!     vec!["time".to_string(), "v".to_string()],
//!     vec![Row::new().cell("time", Some("1614556800")).cell("v", Some("0.5"))],
//! );
//! let tree = shape(&mut rows, "t").unwrap();
//! assert_eq!(
//!     serde_json::to_string(&tree).unwrap(),
//!     r#"{"results":[{"series":[{"names":"t","columns":["time","v"],"values":[[1614556800,0.5]]}]}]}"#
//! );
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod shape;
pub mod translate;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState, Credentials};

pub use config::{
    AuthConfig, Config, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig,
};

pub use db::{Database, DbError, QueryBackend};

pub use shape::{shape, FetchedRows, ResultTree, Row, RowSource, ShapeError, Value};

pub use translate::{translate, Dialect};
