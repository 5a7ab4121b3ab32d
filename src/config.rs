// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::error::PipelineError;

/// One input file and the fields to keep from it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Ordered projection list; the key field is implicit.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Everything a merge run needs, supplied from outside the core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub left: SourceConfig,
    pub right: SourceConfig,
    pub output: PathBuf,
    /// Region allow-list, applied to both sources.
    pub regions: Vec<String>,

    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default = "default_county_field")]
    pub county_field: String,
    #[serde(default = "default_region_field")]
    pub region_field: String,
    /// Records before the header row in each source.
    #[serde(default = "default_title_rows")]
    pub title_rows: usize,
    /// Appended to right-side fields whose name the left side already uses.
    #[serde(default = "default_collision_suffix")]
    pub collision_suffix: String,
    /// Merged rows echoed to the log after a run.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_key_field() -> String {
    "FIPS".into()
}
fn default_county_field() -> String {
    "County".into()
}
fn default_region_field() -> String {
    "State".into()
}
fn default_title_rows() -> usize {
    1
}
fn default_collision_suffix() -> String {
    "_right".into()
}
fn default_preview_rows() -> usize {
    5
}

impl Config {
    /// Read and validate a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("in config {:?}", path))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("parsing YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        let bad = |msg: String| Err(PipelineError::Config(msg));

        for (name, path) in [
            ("left.path", &self.left.path),
            ("right.path", &self.right.path),
            ("output", &self.output),
        ] {
            if path.as_os_str().is_empty() {
                return bad(format!("{} is empty", name));
            }
        }
        if self.output == self.left.path || self.output == self.right.path {
            return bad(format!("output {:?} would overwrite an input", self.output));
        }

        for (name, value) in [
            ("key_field", &self.key_field),
            ("county_field", &self.county_field),
            ("region_field", &self.region_field),
        ] {
            if value.trim().is_empty() {
                return bad(format!("{} is empty", name));
            }
        }
        if self.collision_suffix.is_empty() {
            return bad("collision_suffix is empty".into());
        }

        if self.regions.is_empty() {
            return bad("regions allow-list is empty".into());
        }
        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.trim().is_empty() {
                return bad("regions contains an empty name".into());
            }
            if !seen.insert(region.as_str()) {
                return bad(format!("region {:?} listed twice", region));
            }
        }

        for (side, fields) in [("left", &self.left.fields), ("right", &self.right.fields)] {
            if fields.iter().any(|f| f.trim().is_empty()) {
                return bad(format!("{}.fields contains an empty name", side));
            }
        }
        Ok(())
    }
}
