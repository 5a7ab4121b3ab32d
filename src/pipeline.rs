// src/pipeline.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::{Config, SourceConfig};
use crate::dataset::{load_dataset, write_dataset, Dataset};
use crate::error::PipelineError;
use crate::process::{
    filter_rows, inner_join, normalize_dataset, project, FilterReport, FilterRules, JoinReport,
    NormalizeReport, ProjectReport,
};

/// Which input a branch is working on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// What Normalizer → RowFilter → Projector did to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReport {
    pub side: Side,
    pub normalize: NormalizeReport,
    pub filter: FilterReport,
    pub project: ProjectReport,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub dataset: Dataset,
    pub left: BranchReport,
    pub right: BranchReport,
    pub join: JoinReport,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub left: BranchReport,
    pub right: BranchReport,
    pub join: JoinReport,
}

/// The normalize/filter/project/join flow over two county datasets.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn source(&self, side: Side) -> &SourceConfig {
        match side {
            Side::Left => &self.config.left,
            Side::Right => &self.config.right,
        }
    }

    /// Key, county and region fields must all be present in the trimmed schema.
    fn require_fields(&self, side: Side, dataset: &Dataset) -> Result<(), PipelineError> {
        for field in [
            &self.config.key_field,
            &self.config.county_field,
            &self.config.region_field,
        ] {
            if !dataset.has_field(field) {
                return Err(PipelineError::MissingField {
                    dataset: side.as_str().to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self, dataset), fields(side = side.as_str()))]
    fn branch(&self, side: Side, dataset: Dataset) -> Result<(Dataset, BranchReport)> {
        let cfg = &self.config;

        let normalized = normalize_dataset(dataset, &cfg.key_field);
        self.require_fields(side, &normalized.dataset)?;
        let filtered = filter_rows(
            normalized.dataset,
            &FilterRules {
                county_field: &cfg.county_field,
                region_field: &cfg.region_field,
                regions: &cfg.regions,
            },
        );
        let projected = project(filtered.dataset, &cfg.key_field, &self.source(side).fields);

        info!(
            rows_in = filtered.report.rows_in,
            rows_out = filtered.report.rows_out,
            columns = projected.dataset.width(),
            "branch done"
        );
        Ok((
            projected.dataset,
            BranchReport {
                side,
                normalize: normalized.report,
                filter: filtered.report,
                project: projected.report,
            },
        ))
    }

    /// Run both branches in parallel and inner-join their results.
    pub fn merge(&self, left: Dataset, right: Dataset) -> Result<MergeOutcome> {
        let (l, r) = rayon::join(
            || self.branch(Side::Left, left),
            || self.branch(Side::Right, right),
        );
        let (left, left_report) = l?;
        let (right, right_report) = r?;

        let joined = inner_join(
            left,
            right,
            &self.config.key_field,
            &self.config.collision_suffix,
        );
        if joined.report.has_anomalies() {
            warn!(report = ?joined.report, "join anomalies");
        }

        Ok(MergeOutcome {
            dataset: joined.dataset,
            left: left_report,
            right: right_report,
            join: joined.report,
        })
    }

    /// Load both sources, merge them and write the output file.
    #[instrument(level = "info", skip(self), fields(output = %self.config.output.display()))]
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let cfg = &self.config;

        let (l, r) = rayon::join(
            || load_dataset(&cfg.left.path, cfg.title_rows),
            || load_dataset(&cfg.right.path, cfg.title_rows),
        );
        let left = l.context("loading left source")?;
        let right = r.context("loading right source")?;
        info!(left = left.len(), right = right.len(), "sources loaded");

        let outcome = self.merge(left, right)?;
        write_dataset(&cfg.output, &outcome.dataset)
            .with_context(|| format!("writing {:?}", cfg.output))?;

        info!(
            rows = outcome.dataset.len(),
            columns = outcome.dataset.width(),
            elapsed = ?start.elapsed(),
            "merged shape"
        );
        for line in preview(&outcome.dataset, cfg.preview_rows) {
            info!("{}", line);
        }

        Ok(RunSummary {
            output: cfg.output.clone(),
            rows: outcome.dataset.len(),
            columns: outcome.dataset.width(),
            left: outcome.left,
            right: outcome.right,
            join: outcome.join,
        })
    }
}

/// First `n` rows as `field=value` lines.
pub fn preview(dataset: &Dataset, n: usize) -> Vec<String> {
    (0..dataset.len().min(n))
        .map(|i| {
            dataset
                .schema
                .iter()
                .map(|f| format!("{}={}", f, dataset.value(i, f)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}
