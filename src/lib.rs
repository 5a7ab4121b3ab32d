pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod process;

pub use config::Config;
pub use dataset::{Dataset, Row, Value};
pub use error::PipelineError;
pub use pipeline::{MergeOutcome, Pipeline, RunSummary};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,countymerge=debug")),
        )
        .with_test_writer()
        .finish();
    // ignore the error when another test already installed it
    let _ = tracing::subscriber::set_global_default(subscriber);
}
