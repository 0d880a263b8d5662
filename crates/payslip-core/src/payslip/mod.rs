//! Payslip field extraction module.

mod extractor;
pub mod rules;

pub use extractor::{ExtractionOutcome, FieldResolution, PayslipParser};

/// Trait for payslip field extractors.
///
/// Extraction is total: any input, including an empty one, produces a
/// record in which unresolved fields are simply absent.
pub trait PayslipExtractor {
    /// Extract fields from an ordered line sequence.
    fn extract(&self, lines: &[String]) -> ExtractionOutcome;

    /// Extract fields from text holding one recognized line per row.
    fn extract_from_text(&self, text: &str) -> ExtractionOutcome {
        let lines: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        self.extract(&lines)
    }
}
