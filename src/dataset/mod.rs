// src/dataset/mod.rs
pub mod json;
pub mod load;
pub mod write;

pub use json::to_json_records;
pub use load::load_dataset;
pub use write::write_dataset;

use std::collections::HashMap;
use std::fmt;

use crate::process::utils::clean_str;

/// Cell texts read as missing, the same set pandas treats as NA by default.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell as read from a source file or produced by a stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Classify a raw CSV cell: blank or an NA token is Null, then integer, then
    /// finite float, else text.
    pub fn from_raw(raw: &str) -> Self {
        let cleaned = clean_str(raw);
        if cleaned.is_empty() || NA_TOKENS.contains(&cleaned.as_str()) {
            return Value::Null;
        }
        if let Ok(i) = cleaned.parse::<i64>() {
            return Value::Int(i);
        }
        match cleaned.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(cleaned),
        }
    }

    /// True for Null and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            // whole floats keep their ".0" so 1001.0 reads back the way it was ingested
            Value::Float(v) if v.fract() == 0.0 && v.abs() < 1e16 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Field name → value. Absent and Null fields are treated alike.
pub type Row = HashMap<String, Value>;

/// Build a row from `(field, value)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Ordered rows plus the ordered list of field names they carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub schema: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(schema: Vec<String>, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Schema presence predicate.
    pub fn has_field(&self, name: &str) -> bool {
        self.schema.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.schema.len()
    }

    /// Value of `field` in row `idx`, `Null` when the field is absent.
    pub fn value(&self, idx: usize, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(idx)
            .and_then(|r| r.get(field))
            .unwrap_or(&NULL)
    }

    /// Text form of `key` for every row, in row order.
    pub fn key_values(&self, key: &str) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.get(key).map(Value::to_string).unwrap_or_default())
            .collect()
    }
}
