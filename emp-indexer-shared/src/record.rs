//! Runtime-typed cell values.
//!
//! The source query result has no compile-time schema, so every cell is one
//! of a small set of scalar shapes. Equality and hashing are defined over
//! the full value (floats compare bitwise) so that full-row deduplication
//! is well-defined.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A single scalar value from a source row or staging file.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// A missing value.
    Null,
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A text value, including date strings.
    Text(String),
}

impl CellValue {
    /// Parse a CSV field into a typed value.
    ///
    /// An empty field is a null; otherwise integer, float, and boolean
    /// forms are tried in that order before falling back to text.
    pub fn from_csv_field(field: &str) -> CellValue {
        if field.is_empty() {
            return CellValue::Null;
        }
        if let Ok(int) = field.parse::<i64>() {
            return CellValue::Int(int);
        }
        if let Ok(float) = field.parse::<f64>() {
            return CellValue::Float(float);
        }
        match field {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::Text(field.to_string()),
        }
    }

    /// Render the value as a CSV field. Nulls render as the empty field.
    pub fn to_csv_field(&self) -> String {
        self.to_string()
    }

    /// True if the value is a null.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// True if the value is an integer or a float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(int) => Some(*int as f64),
            CellValue::Float(float) => Some(*float),
            _ => None,
        }
    }

    /// Convert to a JSON value for indexing.
    ///
    /// Non-finite floats have no JSON representation and map to null.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Int(int) => Value::from(*int),
            CellValue::Float(float) => serde_json::Number::from_f64(*float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Bool(bool) => Value::from(*bool),
            CellValue::Text(text) => Value::from(text.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(int) => write!(f, "{}", int),
            // Integral floats keep a decimal point so the CSV round trip
            // preserves the column's float shape.
            CellValue::Float(float) if float.fract() == 0.0 && float.is_finite() => {
                write!(f, "{:.1}", float)
            }
            CellValue::Float(float) => write!(f, "{}", float),
            CellValue::Bool(bool) => write!(f, "{}", bool),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            // Bitwise so a row equals itself even when a float is NaN.
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Int(int) => int.hash(state),
            CellValue::Float(float) => float.to_bits().hash(state),
            CellValue::Bool(bool) => bool.hash(state),
            CellValue::Text(text) => text.hash(state),
        }
    }
}
