//! Core library for payslip OCR field extraction.
//!
//! This crate provides:
//! - Line sources turning OCR output (text dumps, JSON dumps, text-layer PDFs)
//!   into one ordered line sequence
//! - The payslip field catalog (identifiers, keyword aliases, line offsets)
//! - Single-pass keyword extraction with tiered value resolution
//! - Reporting period (month/year) detection

pub mod error;
pub mod models;
pub mod payslip;
pub mod source;

pub use error::{CatalogError, PayslipError, Result, SourceError};
pub use models::{ExtractionRecord, FieldCatalog, FieldSpec, PayslipConfig, PERIOD_FIELD};
pub use payslip::{ExtractionOutcome, FieldResolution, PayslipExtractor, PayslipParser};
pub use payslip::rules::{normalize_line, ResolutionTier};
pub use source::{LineSequence, LineSource, OcrDump, TextDump};

#[cfg(feature = "pdf")]
pub use source::PdfText;
