// src/dataset/write.rs
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::info;

use super::{Dataset, Value};

/// Write `dataset` as comma-delimited text: header row, then one row per record.
///
/// Data lands in a temp file beside `path` and replaces it only once fully flushed.
#[tracing::instrument(level = "info", skip(path, dataset), fields(path = %path.as_ref().display()))]
pub fn write_dataset<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().context("resolving current directory")?,
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    write_records(tmp.as_file_mut(), dataset)
        .with_context(|| format!("writing rows for {:?}", path))?;
    tmp.as_file().sync_all().context("syncing output")?;
    tmp.persist(path)
        .with_context(|| format!("moving output into place at {:?}", path))?;

    info!(rows = dataset.len(), columns = dataset.width(), "wrote dataset");
    Ok(())
}

/// Serialize `dataset` to any writer.
pub fn write_records<W: Write>(writer: W, dataset: &Dataset) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(&dataset.schema)?;
    for row in &dataset.rows {
        let cells = dataset
            .schema
            .iter()
            .map(|f| row.get(f).map(Value::to_string).unwrap_or_default());
        wtr.write_record(cells)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_dataset, row};
    use tempfile::tempdir;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["FIPS".into(), "County".into(), "X".into()],
            vec![
                row([
                    ("FIPS", Value::from("01001")),
                    ("County", Value::from("Autauga, AL")),
                    ("X", Value::Int(10)),
                ]),
                row([("FIPS", Value::from("01003"))]),
            ],
        )
    }

    #[test]
    fn writes_header_and_rows_in_schema_order() -> Result<()> {
        let mut buf = Vec::new();
        write_records(&mut buf, &sample())?;
        let text = String::from_utf8(buf)?;
        assert_eq!(text, "FIPS,County,X\n01001,\"Autauga, AL\",10\n01003,,\n");
        Ok(())
    }

    #[test]
    fn output_reloads_with_same_shape() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("nested").join("merged.csv");
        write_dataset(&out, &sample())?;

        let back = load_dataset(&out, 0)?;
        assert_eq!(back.schema, vec!["FIPS", "County", "X"]);
        assert_eq!(back.len(), 2);
        assert_eq!(back.value(0, "County"), &Value::from("Autauga, AL"));
        Ok(())
    }

    #[test]
    fn no_temp_files_left_behind() -> Result<()> {
        let dir = tempdir()?;
        write_dataset(dir.path().join("merged.csv"), &sample())?;
        let names: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names.len(), 1);
        Ok(())
    }
}
