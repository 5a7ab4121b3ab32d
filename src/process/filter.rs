// src/process/filter.rs
use std::collections::HashMap;
use tracing::info;

use crate::dataset::{Dataset, Value};

/// Which fields identify a county row and which regions are kept.
#[derive(Debug, Clone)]
pub struct FilterRules<'a> {
    pub county_field: &'a str,
    pub region_field: &'a str,
    /// Ordered allow-list of region names.
    pub regions: &'a [String],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Aggregate rows: no county identity.
    pub dropped_no_county: usize,
    /// County rows whose region is outside the allow-list.
    pub dropped_region: usize,
    /// Surviving rows per region, in allow-list order.
    pub by_region: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct Filtered {
    pub dataset: Dataset,
    pub report: FilterReport,
}

fn region_name(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.to_string().trim().to_string()),
    }
}

/// Keep rows that have a county and belong to an allowed region, preserving order.
#[tracing::instrument(level = "debug", skip(dataset, rules), fields(rows = dataset.len()))]
pub fn filter_rows(dataset: Dataset, rules: &FilterRules<'_>) -> Filtered {
    let mut counts: HashMap<&str, usize> = rules.regions.iter().map(|r| (r.as_str(), 0)).collect();
    let mut report = FilterReport {
        rows_in: dataset.len(),
        ..Default::default()
    };

    let Dataset { schema, rows } = dataset;
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        let has_county = row
            .get(rules.county_field)
            .map(|v| !v.is_blank())
            .unwrap_or(false);
        if !has_county {
            report.dropped_no_county += 1;
            continue;
        }
        let slot = match region_name(row.get(rules.region_field)) {
            Some(name) => counts.get_mut(name.as_str()),
            None => None,
        };
        match slot {
            Some(n) => *n += 1,
            None => {
                report.dropped_region += 1;
                continue;
            }
        }
        kept.push(row);
    }

    report.rows_out = kept.len();
    report.by_region = rules
        .regions
        .iter()
        .map(|r| (r.clone(), counts.get(r.as_str()).copied().unwrap_or(0)))
        .collect();

    for (region, n) in &report.by_region {
        info!(region = %region, counties = n, "rows kept");
    }

    Filtered {
        dataset: Dataset::new(schema, kept),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::row;
    use std::collections::HashSet;

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec!["FIPS".into(), "State".into(), "County".into()],
            vec![
                row([("FIPS", "01000"), ("State", "Alabama")]),
                row([("FIPS", "01001"), ("State", "Alabama"), ("County", "Autauga")]),
                row([("FIPS", "36001"), ("State", "New York"), ("County", "")]),
                row([("FIPS", "06037"), ("State", "California"), ("County", "Los Angeles")]),
                row([("FIPS", "01003"), ("State", "Alabama"), ("County", "Baldwin")]),
                row([("FIPS", "36005"), ("State", "New York"), ("County", "Bronx")]),
            ],
        )
    }

    #[test]
    fn drops_aggregates_and_foreign_regions() {
        crate::init_test_logging();
        let allow = regions(&["New York", "Alabama"]);
        let rules = FilterRules {
            county_field: "County",
            region_field: "State",
            regions: &allow,
        };
        let out = filter_rows(sample(), &rules);

        assert_eq!(out.dataset.key_values("FIPS"), vec!["01001", "01003", "36005"]);
        assert_eq!(out.report.rows_in, 6);
        assert_eq!(out.report.rows_out, 3);
        assert_eq!(out.report.dropped_no_county, 2);
        assert_eq!(out.report.dropped_region, 1);
        assert_eq!(
            out.report.by_region,
            vec![("New York".to_string(), 1), ("Alabama".to_string(), 2)]
        );
    }

    #[test]
    fn output_regions_are_within_allow_list() {
        let allow = regions(&["Alabama"]);
        let rules = FilterRules {
            county_field: "County",
            region_field: "State",
            regions: &allow,
        };
        let out = filter_rows(sample(), &rules);

        let seen: HashSet<String> = out
            .dataset
            .rows
            .iter()
            .map(|r| r["State"].to_string())
            .collect();
        assert!(seen.iter().all(|s| allow.contains(s)));
        assert!(out.dataset.rows.iter().all(|r| !r["County"].is_blank()));
    }

    #[test]
    fn empty_allow_list_keeps_nothing() {
        let rules = FilterRules {
            county_field: "County",
            region_field: "State",
            regions: &[],
        };
        let out = filter_rows(sample(), &rules);
        assert!(out.dataset.is_empty());
        assert!(out.report.by_region.is_empty());
    }
}
