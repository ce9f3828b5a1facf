//! Result Shaping
//!
//! Turns string-typed database rows into the nested envelope Influx clients
//! expect:
//!
//! - **Result tree**: `results[0].series[0]` holding the column header and
//!   one value array per row
//! - **Rows**: ordered column/value pairs read from a [`RowSource`]
//! - **Shaper**: coerces `time` to an unsigned integer and every other
//!   numeric-looking value to a float, keeping values aligned with the
//!   column header
//!
//! # Wire format
//!
//! ```text
//! {"results":[{"series":[{"names":"...","columns":["time","a"],"values":[[100,1.5]]}]}]}
//! ```

mod error;
mod result;
mod row;
mod shaper;

pub use error::{RowSourceError, ShapeError, ShapeResult};
pub use result::{ResultTree, Serie, Series, Value};
pub use row::{FetchedRows, Row, RowSource, NULL_SENTINEL};
pub use shaper::{shape, TIME_COLUMN};
