//! SQL dialects
//!
//! Each supported database has its own interval literal syntax. Adding a
//! backend means adding a variant here and its arm in
//! [`Dialect::format_interval`].

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SQL flavour of the backing database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB: `interval 5 minute`
    MySql,
    /// PostgreSQL: `'5 minute'::interval`
    #[serde(alias = "postgresql", alias = "pq")]
    Postgres,
}

impl Dialect {
    /// Render an interval of `amount` units (`unit` is a singular SQL unit
    /// name such as `minute`).
    pub fn format_interval(self, amount: &str, unit: &str) -> String {
        match self {
            Dialect::MySql => format!("interval {} {}", amount, unit),
            Dialect::Postgres => format!(" '{} {}'::interval", amount, unit),
        }
    }

    /// Driver name as used in configuration
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver name that maps to no supported dialect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported database driver: {0} (expected mysql or postgres)")]
pub struct ParseDialectError(pub String);

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pq" => Ok(Dialect::Postgres),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}
