//! Configuration structures for the payslip pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::catalog::{FieldCatalog, PERIOD_FIELD};
use crate::error::{PayslipError, Result};
use crate::payslip::rules::{DEFAULT_ANCHOR_DAY, DEFAULT_LOOKAHEAD_LIMIT};

/// Main configuration for the payslip pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayslipConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Line source configuration.
    pub source: SourceConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines scanned below a keyword for fields without a fixed offset.
    pub lookahead_limit: usize,

    /// Day of month used to normalize the reporting period.
    pub period_anchor_day: u32,

    /// Output identifier of the reporting period.
    pub period_field: String,

    /// JSON file replacing the built-in field catalog.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            lookahead_limit: DEFAULT_LOOKAHEAD_LIMIT,
            period_anchor_day: DEFAULT_ANCHOR_DAY,
            period_field: PERIOD_FIELD.to_string(),
            catalog_path: None,
        }
    }
}

/// Line source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Page separator in plain-text OCR dumps.
    pub page_separator: String,

    /// Password for encrypted PDFs (empty password is always tried).
    pub pdf_password: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_separator: "\u{000c}".to_string(),
            pdf_password: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON records.
    pub pretty_json: bool,

    /// Default CSV sheet used by the export command.
    pub sheet_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            sheet_path: None,
        }
    }
}

impl PayslipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractor cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=28).contains(&self.extraction.period_anchor_day) {
            return Err(PayslipError::Config(format!(
                "period_anchor_day must be between 1 and 28, got {}",
                self.extraction.period_anchor_day
            )));
        }
        if self.extraction.period_field.trim().is_empty() {
            return Err(PayslipError::Config("period_field must not be empty".to_string()));
        }
        Ok(())
    }

    /// The field catalog in effect: the override file if set, else the built-in one.
    pub fn load_catalog(&self) -> Result<FieldCatalog> {
        let period_field = &self.extraction.period_field;
        match &self.extraction.catalog_path {
            Some(path) => FieldCatalog::from_file(path, period_field),
            None if period_field == PERIOD_FIELD => Ok(FieldCatalog::payslip()),
            None => Ok(FieldCatalog::with_period_field(
                FieldCatalog::payslip().fields().to_vec(),
                period_field.as_str(),
            )?),
        }
    }
}
