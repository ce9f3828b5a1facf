//! Row shaping
//!
//! Values are laid out by the column header read once from the source, never
//! by the order cells happen to appear in a row, so every value array lines
//! up with `columns`. A row whose `time` cannot be read as an unsigned
//! integer fails the whole result; nothing partial is returned.

use super::error::{ShapeError, ShapeResult};
use super::result::{ResultTree, Serie, Value};
use super::row::{Row, RowSource, NULL_SENTINEL};

/// Column holding each row's timestamp
pub const TIME_COLUMN: &str = "time";

/// Drain `source` into a single-serie result tree named `name`.
///
/// The header must name a `time` column even when there are no rows, so a
/// bare `SELECT 1` fails with [`ShapeError::MissingTimeColumn`].
pub fn shape<S>(source: &mut S, name: &str) -> ShapeResult<ResultTree>
where
    S: RowSource + ?Sized,
{
    let columns = source.columns().to_vec();
    if columns.is_empty() {
        return Err(ShapeError::EmptySchema);
    }
    if !columns.iter().any(|c| c == TIME_COLUMN) {
        return Err(ShapeError::MissingTimeColumn);
    }

    let mut serie = Serie::new(name, columns);
    let mut index = 0;
    while let Some(row) = source.next_row()? {
        if row.is_empty() {
            continue;
        }
        let values = shape_row(&row, &serie.columns, index)?;
        serie.values.push(values);
        index += 1;
    }

    tracing::debug!(rows = serie.values.len(), columns = serie.columns.len(), "Shaped result set");
    Ok(ResultTree::single(serie))
}

/// `time` first, then every other column in header order.
fn shape_row(row: &Row, columns: &[String], index: usize) -> ShapeResult<Vec<Value>> {
    let raw_time = row.text(TIME_COLUMN).unwrap_or(NULL_SENTINEL);
    let time = raw_time
        .parse::<u64>()
        .map_err(|_| ShapeError::InvalidTime {
            row: index,
            value: raw_time.to_string(),
        })?;

    let mut values = Vec::with_capacity(columns.len());
    values.push(Value::Time(time));
    values.extend(
        columns
            .iter()
            .filter(|column| column.as_str() != TIME_COLUMN)
            .map(|column| Value::from(row.text(column).unwrap_or(NULL_SENTINEL))),
    );
    Ok(values)
}
