use anyhow::{Context, Result};
use clap::Parser;
use countymerge::dataset::{load_dataset, to_json_records};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Print a merged dataset as a JSON array of records on stdout.
#[derive(Parser)]
#[command(author, version, about = "Dump a merged county dataset as JSON records")]
struct Args {
    /// Merged CSV produced by `countymerge`
    input: PathBuf,
    /// Records before the header row
    #[arg(long, default_value_t = 0)]
    title_rows: usize,
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let dataset = load_dataset(&args.input, args.title_rows)?;
    info!(rows = dataset.len(), columns = dataset.width(), "loaded");

    let records = to_json_records(&dataset);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if args.pretty {
        serde_json::to_writer_pretty(&mut out, &records)
    } else {
        serde_json::to_writer(&mut out, &records)
    };
    written.context("writing JSON to stdout")?;
    writeln!(out)?;
    Ok(())
}
