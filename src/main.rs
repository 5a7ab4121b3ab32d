use anyhow::Result;
use clap::Parser;
use countymerge::{Config, Pipeline};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Join two county-level health datasets on their FIPS code"
)]
struct Args {
    /// YAML run configuration
    #[arg(short, long, default_value = "config/chr2025.yaml")]
    config: PathBuf,
    /// Override the left (primary) source file
    #[arg(long)]
    left: Option<PathBuf>,
    /// Override the right (enrichment) source file
    #[arg(long)]
    right: Option<PathBuf>,
    /// Override the output file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) load config, apply overrides ─────────────────────────────
    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    if let Some(p) = args.left {
        config.left.path = p;
    }
    if let Some(p) = args.right {
        config.right.path = p;
    }
    if let Some(p) = args.output {
        config.output = p;
    }
    info!(config = %args.config.display(), regions = config.regions.len(), "startup");

    // ─── 3) run ──────────────────────────────────────────────────────
    let summary = match Pipeline::new(config).and_then(|p| p.run()) {
        Ok(s) => s,
        Err(e) => {
            error!("merge failed: {:#}", e);
            return Err(e);
        }
    };

    for branch in [&summary.left, &summary.right] {
        if !branch.project.missing.is_empty() {
            info!(
                side = branch.side.as_str(),
                missing = ?branch.project.missing,
                "configured fields absent from source"
            );
        }
    }
    info!(
        output = %summary.output.display(),
        rows = summary.rows,
        columns = summary.columns,
        "saved"
    );
    Ok(())
}
