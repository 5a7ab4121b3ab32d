// src/process/join.rs
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::dataset::{Dataset, Row, Value};

/// Anomalies and coverage of one join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub left_rows: usize,
    pub right_rows: usize,
    pub matched: usize,
    /// Distinct keys only the left side has.
    pub left_only: usize,
    /// Distinct keys only the right side has.
    pub right_only: usize,
    /// Rows dropped because an earlier row on the same side had the key.
    pub left_duplicates: usize,
    pub right_duplicates: usize,
    /// Right-side fields renamed to avoid a clash: `(source name, output name)`.
    pub collisions: Vec<(String, String)>,
}

impl JoinReport {
    /// True when the join ran into duplicates or name clashes.
    pub fn has_anomalies(&self) -> bool {
        self.left_duplicates > 0 || self.right_duplicates > 0 || !self.collisions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Joined {
    pub dataset: Dataset,
    pub report: JoinReport,
}

/// Left schema followed by the right schema without its key. A right field whose
/// name is already taken gets `suffix` (then a counter) appended.
///
/// Returns the merged schema and the `(right name, output name)` mapping.
pub fn merged_schema(
    left: &[String],
    right: &[String],
    key_field: &str,
    suffix: &str,
) -> (Vec<String>, Vec<(String, String)>) {
    let mut schema: Vec<String> = left.to_vec();
    let mut taken: HashSet<String> = left.iter().cloned().collect();
    let mut mapping = Vec::with_capacity(right.len());

    for field in right.iter().filter(|f| f.as_str() != key_field) {
        let mut out = field.clone();
        let mut n = 1;
        while taken.contains(&out) {
            out = if n == 1 {
                format!("{}{}", field, suffix)
            } else {
                format!("{}{}{}", field, suffix, n)
            };
            n += 1;
        }
        taken.insert(out.clone());
        schema.push(out.clone());
        mapping.push((field.clone(), out));
    }
    (schema, mapping)
}

fn key_of(row: &Row, key_field: &str) -> String {
    row.get(key_field).map(Value::to_string).unwrap_or_default()
}

/// Inner join on `key_field`, one output row per shared key, in left row order.
///
/// The first row for a key wins on each side; later ones are counted and dropped.
#[tracing::instrument(level = "debug", skip(left, right), fields(left = left.len(), right = right.len()))]
pub fn inner_join(left: Dataset, right: Dataset, key_field: &str, suffix: &str) -> Joined {
    let (schema, mapping) = merged_schema(&left.schema, &right.schema, key_field, suffix);
    let mut report = JoinReport {
        left_rows: left.len(),
        right_rows: right.len(),
        ..Default::default()
    };
    report.collisions = mapping
        .iter()
        .filter(|(src, out)| src != out)
        .cloned()
        .collect();
    for (src, out) in &report.collisions {
        warn!(field = %src, renamed = %out, "field present on both sides");
    }

    // first occurrence of each right key
    let mut right_rows: Vec<Row> = right.rows;
    let mut right_index: HashMap<String, usize> = HashMap::with_capacity(right_rows.len());
    for (idx, row) in right_rows.iter().enumerate() {
        let key = key_of(row, key_field);
        if right_index.contains_key(&key) {
            report.right_duplicates += 1;
            continue;
        }
        right_index.insert(key, idx);
    }

    let mut seen_left: HashSet<String> = HashSet::with_capacity(left.rows.len());
    let mut used_right: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();
    for mut row in left.rows {
        let key = key_of(&row, key_field);
        if !seen_left.insert(key.clone()) {
            report.left_duplicates += 1;
            continue;
        }
        let Some(&ridx) = right_index.get(&key) else {
            report.left_only += 1;
            continue;
        };
        let mut other = std::mem::take(&mut right_rows[ridx]);
        for (src, out) in &mapping {
            if let Some(v) = other.remove(src) {
                row.insert(out.clone(), v);
            }
        }
        used_right.insert(key);
        rows.push(row);
    }

    report.matched = rows.len();
    report.right_only = right_index.len() - used_right.len();

    if report.left_duplicates > 0 || report.right_duplicates > 0 {
        warn!(
            left = report.left_duplicates,
            right = report.right_duplicates,
            "duplicate keys dropped; first occurrence kept"
        );
    }
    info!(
        matched = report.matched,
        left_only = report.left_only,
        right_only = report.right_only,
        "joined"
    );

    Joined {
        dataset: Dataset::new(schema, rows),
        report,
    }
}
