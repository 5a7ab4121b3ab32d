// src/process/normalize.rs
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::dataset::{Dataset, Row, Value};
use crate::process::utils::clean_str;

/// Width of a canonical county key (2-digit region + 3-digit county).
pub const KEY_WIDTH: usize = 5;

/// Suffix left behind when integer keys were ingested as floats.
const FLOAT_SUFFIX: &str = ".0";

static CANONICAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}$").expect("static key pattern"));

/// What normalization changed, for the run report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows: usize,
    pub padded: usize,
    pub float_suffix_stripped: usize,
    /// Keys wider than [`KEY_WIDTH`]; passed through untouched.
    pub overlong: usize,
    /// Keys that are not exactly five digits after canonicalization.
    pub malformed: usize,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

/// Text form of a key with the float artifact stripped and zeros left-padded to five.
///
/// Values already wider than five characters are returned as-is.
pub fn canonical_key(value: &Value) -> String {
    let text = clean_str(&value.to_string());
    let digits = text.strip_suffix(FLOAT_SUFFIX).unwrap_or(&text);
    format!("{:0>width$}", digits, width = KEY_WIDTH)
}

/// True when `key` is exactly five ASCII digits.
pub fn is_canonical(key: &str) -> bool {
    CANONICAL_KEY.is_match(key)
}

/// Trim every field name and replace the key value with its canonical form.
pub fn normalize_row(row: &Row, key_field: &str) -> Row {
    row.iter()
        .map(|(name, value)| {
            let name = name.trim().to_string();
            let value = if name == key_field {
                Value::Text(canonical_key(value))
            } else {
                value.clone()
            };
            (name, value)
        })
        .collect()
}

/// Normalize every row (and the schema's names) of `dataset`.
#[tracing::instrument(level = "debug", skip(dataset), fields(rows = dataset.len()))]
pub fn normalize_dataset(dataset: Dataset, key_field: &str) -> Normalized {
    let schema: Vec<String> = dataset.schema.iter().map(|n| n.trim().to_string()).collect();
    let mut report = NormalizeReport {
        rows: dataset.len(),
        ..Default::default()
    };

    let rows: Vec<Row> = dataset
        .rows
        .iter()
        .map(|raw| {
            let row = normalize_row(raw, key_field);
            if let Some(Value::Text(key)) = row.get(key_field) {
                let before = raw
                    .iter()
                    .find(|(n, _)| n.trim() == key_field)
                    .map(|(_, v)| clean_str(&v.to_string()))
                    .unwrap_or_default();
                let digits = match before.strip_suffix(FLOAT_SUFFIX) {
                    Some(d) => {
                        report.float_suffix_stripped += 1;
                        d
                    }
                    None => before.as_str(),
                };
                if digits.len() < key.len() {
                    report.padded += 1;
                }
                if key.len() > KEY_WIDTH {
                    report.overlong += 1;
                    warn!(key = %key, "key wider than {} characters left as-is", KEY_WIDTH);
                }
                if !is_canonical(key) {
                    report.malformed += 1;
                }
            }
            row
        })
        .collect();

    debug!(?report, "normalized");
    Normalized {
        dataset: Dataset::new(schema, rows),
        report,
    }
}
