use thiserror::Error;

/// Structural failures that abort a merge run.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{dataset} dataset is missing required field `{field}`")]
    MissingField { dataset: String, field: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
