//! Export command - append extracted records to a CSV sheet.
//!
//! The sheet's first row must be the record column list. If it is missing or
//! differs, the expected header row is inserted on top before appending.
//! Every row is built from the header list so a missing key leaves an empty
//! cell instead of shifting later columns.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde_json::Value;
use tracing::debug;

use super::load_config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Record JSON files written by `extract` or `batch`
    #[arg(required = true)]
    records: Vec<PathBuf>,

    /// CSV sheet to append to (default: output.sheet_path from config)
    #[arg(short, long)]
    sheet: Option<PathBuf>,
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let Some(sheet) = args.sheet.or_else(|| config.output.sheet_path.clone()) else {
        anyhow::bail!("No sheet given. Pass --sheet or set output.sheet_path in the config.");
    };

    let headers = config.load_catalog()?.headers();

    let mut rows = Vec::with_capacity(args.records.len());
    for path in &args.records {
        let content = std::fs::read_to_string(path)?;
        let record: Value = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        rows.push(row_from_record(&headers, &record)?);
    }

    let inserted_header = append_rows(&sheet, &headers, rows)?;
    if inserted_header {
        println!("{} Column headers inserted.", style("ℹ").blue());
    }

    println!(
        "{} Appended {} rows to {}",
        style("✓").green(),
        args.records.len(),
        sheet.display()
    );

    Ok(())
}

/// Build a sheet row from a record object, in header order.
fn row_from_record(headers: &[String], record: &Value) -> anyhow::Result<Vec<String>> {
    let Some(object) = record.as_object() else {
        anyhow::bail!("record is not a JSON object");
    };

    let row = headers
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = match object.get(field) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            debug!("Column {} ({}): {:?}", idx + 1, field, value);
            value
        })
        .collect();

    Ok(row)
}

/// Append rows to the sheet, inserting the header row first when it differs.
///
/// Returns whether the header row was inserted.
fn append_rows(sheet: &Path, headers: &[String], rows: Vec<Vec<String>>) -> anyhow::Result<bool> {
    let mut existing = read_sheet(sheet)?;

    let inserted_header = existing.first().map(Vec::as_slice) != Some(headers);
    if inserted_header {
        existing.insert(0, headers.to_vec());
    }
    existing.extend(rows);

    if let Some(parent) = sheet.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(sheet)?;
    for row in &existing {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    Ok(inserted_header)
}

fn read_sheet(sheet: &Path) -> anyhow::Result<Vec<Vec<String>>> {
    if !sheet.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(sheet)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["Basic".to_string(), "HRA".to_string(), "Month-Year".to_string()]
    }

    #[test]
    fn test_row_from_record_keeps_columns() {
        let record: Value =
            serde_json::from_str(r#"{"HRA": "500", "Basic": null, "Extra": "x"}"#).unwrap();
        let row = row_from_record(&headers(), &record).unwrap();
        assert_eq!(row, vec!["", "500", ""]);
    }

    #[test]
    fn test_header_inserted_once() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("sheet.csv");

        let first_row = vec!["1".to_string(), "2".to_string(), String::new()];
        let second_row = vec!["3".to_string(), "4".to_string(), String::new()];
        let first = append_rows(&sheet, &headers(), vec![first_row]).unwrap();
        let second = append_rows(&sheet, &headers(), vec![second_row]).unwrap();
        assert!(first);
        assert!(!second);

        let rows = read_sheet(&sheet).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], headers());
        assert_eq!(rows[2][0], "3");
    }

    #[test]
    fn test_header_inserted_above_stale_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("sheet.csv");
        std::fs::write(&sheet, "Old,Header\n9,9\n").unwrap();

        assert!(append_rows(&sheet, &headers(), vec![]).unwrap());

        let rows = read_sheet(&sheet).unwrap();
        assert_eq!(rows[0], headers());
        assert_eq!(rows[1], vec!["Old", "Header"]);
    }
}
