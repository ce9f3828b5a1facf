//! `translateTimePart(...)` rewriting
//!
//! The marker call wraps a fragment of SQL in which Influx-style literals may
//! appear. Two passes run over the argument text, in this order:
//!
//! 1. Epoch literals (`1614556800s`, four or more digits) become quoted
//!    RFC 3339 timestamps in UTC.
//! 2. Duration literals (`5m`, `1h`, ...) become dialect interval expressions.
//!
//! Epochs go first so their trailing `s` is not read as a seconds duration.
//! The marker call itself is dropped; only its rewritten argument remains.

use std::sync::OnceLock;

use chrono::{SecondsFormat, TimeZone, Utc};
use regex::{Captures, Regex};

use super::Dialect;

/// Literal that opens the marker call
pub const MARKER: &str = "translateTimePart(";

/// Influx duration suffixes and the SQL unit each one maps to
const DURATION_UNITS: [(char, &str); 6] = [
    ('u', "microsecond"),
    ('s', "second"),
    ('m', "minute"),
    ('h', "hour"),
    ('d', "day"),
    ('w', "week"),
];

fn epoch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9]{4,})s").expect("epoch pattern is valid"))
}

fn duration_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DURATION_UNITS
            .iter()
            .map(|&(suffix, unit)| {
                let re = Regex::new(&format!("([0-9]+){}", suffix))
                    .expect("duration pattern is valid");
                (re, unit)
            })
            .collect()
    })
}

/// A located marker call, split around its argument list
#[derive(Debug, PartialEq, Eq)]
struct MarkerCall<'a> {
    prefix: &'a str,
    argument: &'a str,
    suffix: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
enum Located<'a> {
    Absent,
    /// The marker opens but its parenthesis never closes
    Unbalanced,
    Found(MarkerCall<'a>),
}

/// Find the first marker call and its matching closing parenthesis.
fn locate(query: &str) -> Located<'_> {
    let Some(start) = query.find(MARKER) else {
        return Located::Absent;
    };
    let args_start = start + MARKER.len();

    let mut depth = 1usize;
    for (offset, c) in query[args_start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let end = args_start + offset;
                    return Located::Found(MarkerCall {
                        prefix: &query[..start],
                        argument: &query[args_start..end],
                        suffix: &query[end + 1..],
                    });
                }
            }
            _ => {}
        }
    }

    Located::Unbalanced
}

/// Rewrite the first `translateTimePart(...)` call in `query` for `dialect`.
///
/// Never fails. A query without the marker comes back unchanged, and so does
/// one whose marker call is never closed: the SQL is passed through as-is and
/// left for the database to reject.
pub fn translate(query: &str, dialect: Dialect) -> String {
    let call = match locate(query) {
        Located::Absent => return query.to_string(),
        Located::Unbalanced => {
            tracing::warn!(query = %query, "Unbalanced {}...) call, passing query through", MARKER);
            return query.to_string();
        }
        Located::Found(call) => call,
    };

    let argument = if call.argument.is_empty() {
        String::new()
    } else {
        rewrite_durations(&rewrite_epochs(call.argument), dialect)
    };

    let mut sql = String::with_capacity(call.prefix.len() + argument.len() + call.suffix.len());
    sql.push_str(call.prefix);
    sql.push_str(&argument);
    sql.push_str(call.suffix);
    sql
}

/// Replace `<epoch seconds>s` with a quoted UTC timestamp.
///
/// Values outside the representable range are left alone.
fn rewrite_epochs(argument: &str) -> String {
    epoch_pattern()
        .replace_all(argument, |caps: &Captures| {
            caps[1]
                .parse::<i64>()
                .ok()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(|ts| format!("'{}'", ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn rewrite_durations(argument: &str, dialect: Dialect) -> String {
    duration_patterns()
        .iter()
        .fold(argument.to_string(), |text, (re, unit)| {
            re.replace_all(&text, |caps: &Captures| dialect.format_interval(&caps[1], unit))
                .into_owned()
        })
}
