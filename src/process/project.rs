// src/process/project.rs
use tracing::{info, warn};

use crate::dataset::{Dataset, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectReport {
    /// Fields actually kept, in output order.
    pub projected: Vec<String>,
    /// Requested fields the source does not have.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Projected {
    pub dataset: Dataset,
    pub report: ProjectReport,
}

/// Output schema for `wanted` over `dataset`: requested fields that exist, in
/// requested order, with `key_field` prepended when the request leaves it out.
pub fn projected_schema(dataset: &Dataset, key_field: &str, wanted: &[String]) -> ProjectReport {
    let mut projected = Vec::with_capacity(wanted.len() + 1);
    let mut missing = Vec::new();

    if !wanted.iter().any(|f| f == key_field) {
        projected.push(key_field.to_string());
    }
    for field in wanted {
        if projected.contains(field) {
            continue;
        }
        if dataset.has_field(field) {
            projected.push(field.clone());
        } else if !missing.contains(field) {
            missing.push(field.clone());
        }
    }

    ProjectReport { projected, missing }
}

/// Reduce every row of `dataset` to the projected schema.
#[tracing::instrument(level = "debug", skip(dataset, wanted), fields(rows = dataset.len()))]
pub fn project(dataset: Dataset, key_field: &str, wanted: &[String]) -> Projected {
    let report = projected_schema(&dataset, key_field, wanted);
    for field in &report.missing {
        warn!(field = %field, "requested field not in source; skipped");
    }
    info!(fields = ?report.projected, "projected fields");

    let rows = dataset
        .rows
        .into_iter()
        .map(|mut row| {
            report
                .projected
                .iter()
                .filter_map(|f| row.remove_entry(f))
                .collect::<Row>()
        })
        .collect();

    Projected {
        dataset: Dataset::new(report.projected.clone(), rows),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{row, Value};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Dataset {
        Dataset::new(
            names(&["FIPS", "State", "County", "X", "Noise"]),
            vec![row([
                ("FIPS", Value::from("01001")),
                ("State", Value::from("Alabama")),
                ("County", Value::from("Autauga")),
                ("X", Value::Int(10)),
                ("Noise", Value::Int(99)),
            ])],
        )
    }

    #[test]
    fn keeps_requested_order_and_skips_absent() {
        crate::init_test_logging();
        let out = project(sample(), "FIPS", &names(&["FIPS", "X", "Life Expectancy", "State"]));

        assert_eq!(out.dataset.schema, names(&["FIPS", "X", "State"]));
        assert_eq!(out.report.missing, names(&["Life Expectancy"]));
        let r = &out.dataset.rows[0];
        assert_eq!(r.len(), 3);
        assert_eq!(r["X"], Value::Int(10));
        assert!(!r.contains_key("Noise"));
    }

    #[test]
    fn key_is_prepended_when_not_requested() {
        let out = project(sample(), "FIPS", &names(&["County", "X"]));
        assert_eq!(out.dataset.schema, names(&["FIPS", "County", "X"]));
        assert_eq!(out.dataset.rows[0]["FIPS"], Value::from("01001"));
    }

    #[test]
    fn schema_is_contained_in_request_plus_key() {
        let wanted = names(&["Population", "X", "X", "County"]);
        let out = project(sample(), "FIPS", &wanted);
        assert!(out
            .dataset
            .schema
            .iter()
            .all(|f| f == "FIPS" || wanted.contains(f)));
        assert_eq!(out.dataset.schema, names(&["FIPS", "X", "County"]));
    }

    #[test]
    fn rows_missing_a_projected_field_stay_sparse() {
        let ds = Dataset::new(names(&["FIPS", "X"]), vec![row([("FIPS", "01003")])]);
        let out = project(ds, "FIPS", &names(&["X"]));
        assert_eq!(out.dataset.schema, names(&["FIPS", "X"]));
        assert_eq!(out.dataset.value(0, "X"), &Value::Null);
    }
}
