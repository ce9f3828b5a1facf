//! Result tree types
//!
//! The three nesting levels always hold exactly one entry each; they exist to
//! match the response envelope of Influx-compatible clients.

use serde::Serialize;

/// Top-level response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTree {
    pub results: Vec<Series>,
}

/// One statement's result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub series: Vec<Serie>,
}

/// A named table of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Serie {
    /// Serialized as `names`, which existing clients of this endpoint read.
    #[serde(rename = "names")]
    pub name: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Value>>,
}

/// A single output cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// The `time` column
    Time(u64),
    /// Any other value that parsed as a finite number
    Number(f64),
    /// Everything else, including the `NULL` sentinel
    Text(String),
}

impl ResultTree {
    /// Wrap a single serie in the full envelope
    pub fn single(serie: Serie) -> Self {
        Self {
            results: vec![Series {
                series: vec![serie],
            }],
        }
    }

    /// The wrapped serie
    pub fn serie(&self) -> Option<&Serie> {
        self.results.first().and_then(|s| s.series.first())
    }
}

impl Serie {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            values: Vec::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(text.to_string()),
        }
    }
}
