//! Query Translation
//!
//! Rewrites the one piece of Influx syntax the service understands into SQL
//! for the configured backend:
//!
//! - **Dialect**: the SQL flavour of the backing database, which decides how
//!   interval literals are written
//! - **Time part**: the `translateTimePart(...)` marker call, whose duration
//!   and epoch literals are rewritten in place
//!
//! Everything outside the marker's argument list is passed through untouched.
//!
//! # Example
//!
//! ```rust
//! use influxsql::translate::{translate, Dialect};
//!
//! let sql = translate(
//!     "SELECT * FROM cpu WHERE time > NOW() - translateTimePart(5m)",
//!     Dialect::MySql,
//! );
//! assert_eq!(sql, "SELECT * FROM cpu WHERE time > NOW() - interval 5 minute");
//! ```

mod dialect;
mod timepart;

pub use dialect::{Dialect, ParseDialectError};
pub use timepart::{translate, MARKER};
