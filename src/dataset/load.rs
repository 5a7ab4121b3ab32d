// src/dataset/load.rs
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashSet, fs::File, io::Read, path::Path};
use tracing::{debug, warn};

use super::{Dataset, Row, Value};

/// Load a delimited file whose header sits after `title_rows` leading records.
///
/// Header names are trimmed (and a leading BOM dropped). Short records are
/// padded with `Null`; cells past the header width are discarded.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(path: P, title_rows: usize) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    read_dataset(file, title_rows).with_context(|| format!("Failed to read {:?}", path))
}

/// Keep the first column under its own name and rename later repeats
/// `<name>.1`, `<name>.2`, ... skipping names already taken.
fn dedupe_headers<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    let names: Vec<String> = names.into_iter().collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 1;
        let renamed = loop {
            let candidate = format!("{}.{}", name, n);
            if taken.insert(candidate.clone()) {
                break candidate;
            }
            n += 1;
        };
        warn!(header = %name, renamed = %renamed, "repeated header renamed");
        out.push(renamed);
    }
    out
}

/// Same as [`load_dataset`] over any reader.
pub fn read_dataset<R: Read>(reader: R, title_rows: usize) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // title rows rarely have the header's width
        .from_reader(reader);

    let mut records = rdr.records().enumerate();

    for _ in 0..title_rows {
        match records.next() {
            Some((idx, rec)) => {
                rec.with_context(|| format!("CSV parse error at title record {}", idx))?;
            }
            None => return Err(anyhow!("file ends before its header row")),
        }
    }

    let schema: Vec<String> = match records.next() {
        Some((idx, rec)) => {
            let rec = rec.with_context(|| format!("CSV parse error at header record {}", idx))?;
            dedupe_headers(
                rec.iter()
                    .map(|h| h.trim_start_matches('\u{feff}').trim().to_string()),
            )
        }
        None => return Err(anyhow!("file has no header row")),
    };

    let mut rows = Vec::new();
    let mut overlong = 0usize;
    for (idx, rec) in records {
        let rec = rec.with_context(|| format!("CSV parse error at record {}", idx))?;
        if rec.len() > schema.len() {
            overlong += 1;
        }
        let mut row = Row::with_capacity(schema.len());
        for (i, name) in schema.iter().enumerate() {
            let value = rec.get(i).map(Value::from_raw).unwrap_or(Value::Null);
            row.insert(name.clone(), value);
        }
        rows.push(row);
    }

    if overlong > 0 {
        warn!(overlong, "records wider than the header were truncated");
    }
    debug!(columns = schema.len(), rows = rows.len(), "loaded dataset");

    Ok(Dataset::new(schema, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn skips_title_row_and_trims_header() -> Result<()> {
        crate::init_test_logging();
        let content = "\u{feff}2025 County Health Rankings,,,\n FIPS ,State,County , X\n01001.0,Alabama,Autauga,10\n01000,Alabama,,3\n";
        let ds = read_dataset(Cursor::new(content), 1)?;

        assert_eq!(ds.schema, vec!["FIPS", "State", "County", "X"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(0, "FIPS"), &Value::Float(1001.0));
        assert_eq!(ds.value(0, "County"), &Value::from("Autauga"));
        assert_eq!(ds.value(0, "X"), &Value::Int(10));
        assert_eq!(ds.value(1, "County"), &Value::Null);
        Ok(())
    }

    #[test]
    fn pads_short_and_truncates_long_records() -> Result<()> {
        let content = "FIPS,State,County\n01001,Alabama\n01003,Alabama,Baldwin,extra\n";
        let ds = read_dataset(Cursor::new(content), 0)?;

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(0, "County"), &Value::Null);
        assert_eq!(ds.rows[1].len(), 3);
        Ok(())
    }

    #[test]
    fn repeated_headers_keep_first_column_under_plain_name() -> Result<()> {
        crate::init_test_logging();
        let content = "FIPS,State,County,Population,95% CI - Low,Population,95% CI - Low\n01001,Alabama,Autauga,58805,1,999,2\n";
        let ds = read_dataset(Cursor::new(content), 0)?;

        assert_eq!(
            ds.schema,
            vec![
                "FIPS",
                "State",
                "County",
                "Population",
                "95% CI - Low",
                "Population.1",
                "95% CI - Low.1"
            ]
        );
        assert_eq!(ds.value(0, "Population"), &Value::Int(58805));
        assert_eq!(ds.value(0, "Population.1"), &Value::Int(999));
        assert_eq!(ds.value(0, "95% CI - Low.1"), &Value::Int(2));
        assert_eq!(ds.rows[0].len(), ds.width());
        Ok(())
    }

    #[test]
    fn renamed_header_skips_names_already_taken() {
        let out = dedupe_headers(["X", "X.1", "X"].map(String::from));
        assert_eq!(out, vec!["X", "X.1", "X.2"]);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = read_dataset(Cursor::new("only a title\n"), 1).unwrap_err();
        assert!(err.to_string().contains("no header"));
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "title\nFIPS,State,County\n36001,New York,Albany\n")?;

        let ds = load_dataset(tmp.path(), 1)?;
        assert_eq!(ds.value(0, "State"), &Value::from("New York"));
        Ok(())
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_dataset("does/not/exist.csv", 1).unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.csv"));
    }
}
