//! Query-result row types
//!
//! Rows arrive from an external query stage as a JSON result set: an ordered
//! sequence of records mapping column names to scalar values. Row order is
//! significant downstream (group discovery is first-occurrence ordered), so
//! result sets are kept as `Vec<DataRecord>` and never re-sorted here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single scalar cell of a query result.
///
/// Deserializes directly from JSON result payloads; `Null` covers both SQL
/// NULL and absent values surfaced as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// SQL NULL / JSON null
    Null,
    /// Boolean column value
    Bool(bool),
    /// Numeric column value (all numeric types widen to f64)
    Number(f64),
    /// Textual column value
    String(String),
}

/// One row of a query result: column name → scalar value.
pub type DataRecord = HashMap<String, DataValue>;

/// Parse a JSON query-result payload (an array of row objects).
pub fn parse_records(payload: &str) -> crate::Result<Vec<DataRecord>> {
    serde_json::from_str(payload)
        .map_err(|e| crate::ScattervizError::DataError(format!("Invalid rows payload: {}", e)))
}

impl DataValue {
    /// Numeric view of the value. Only `Number` qualifies; booleans and
    /// numeric-looking strings do not coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the value, without coercion.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Script-style truthiness, used for the "present and non-empty" test on
    /// the bubble-size dimension: `null`, `false`, `0`, `NaN` and `""` are
    /// all empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::Null => false,
            DataValue::Bool(b) => *b,
            DataValue::Number(n) => *n != 0.0 && !n.is_nan(),
            DataValue::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Number(n) => write!(f, "{}", n),
            DataValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Number(n)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::Number(n as f64)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}
