//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod export;
pub mod extract;
pub mod fields;

use std::path::{Path, PathBuf};

use tracing::debug;

use payslip_core::models::config::{PayslipConfig, SourceConfig};
use payslip_core::source::{self, LineSequence};
use payslip_core::{ExtractionOutcome, ExtractionRecord, PayslipExtractor, PayslipParser};

/// Record output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object in column order
    Json,
    /// CSV header and row
    Csv,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("payslip")
        .join("config.json")
}

/// Load the explicit config file, else the user file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PayslipConfig> {
    if let Some(path) = config_path {
        return Ok(PayslipConfig::from_file(Path::new(path))?);
    }

    let user_path = default_config_path();
    if user_path.exists() {
        debug!("Using configuration from {}", user_path.display());
        return Ok(PayslipConfig::from_file(&user_path)?);
    }

    Ok(PayslipConfig::default())
}

/// A document's lines together with what was extracted from them.
pub struct ExtractedDocument {
    pub lines: LineSequence,
    pub outcome: ExtractionOutcome,
}

/// Read one document's lines and extract its record.
pub fn extract_file(
    path: &Path,
    config: &SourceConfig,
    parser: &PayslipParser,
) -> anyhow::Result<ExtractedDocument> {
    let source = source::open_path(path, config)?;
    let lines = LineSequence::from_source(source.as_ref())?;

    debug!("{}: {} lines over {} pages", path.display(), lines.len(), lines.page_count());

    let outcome = parser.extract(&lines);
    Ok(ExtractedDocument { lines, outcome })
}

/// Render a record in the requested format.
pub fn format_record(
    record: &ExtractionRecord,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractionRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(record.headers())?;
    wtr.write_record(record.to_row())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractionRecord) -> String {
    let width = record.iter().map(|(id, _)| id.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (id, value) in record.iter() {
        output.push_str(&format!("{:<width$}  {}\n", id, value.unwrap_or("-"), width = width));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExtractionRecord {
        PayslipParser::new()
            .extract_from_text("Basic : 1000\nPAY PERIOD AUG 2025")
            .record
    }

    #[test]
    fn test_format_csv() {
        let csv = format_record(&record(), OutputFormat::Csv, false).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Employee Number,Department,"));
        let row = lines.next().unwrap();
        assert!(row.ends_with(",Aug-2025"));
        assert!(row.contains(",1000,"));
    }

    #[test]
    fn test_format_text() {
        let text = format_record(&record(), OutputFormat::Text, false).unwrap();
        assert!(text.lines().any(|l| l.starts_with("Basic") && l.ends_with("1000")));
        assert!(text.lines().any(|l| l.starts_with("HRA") && l.ends_with("-")));
    }
}
