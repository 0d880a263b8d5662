//! Line sources: the boundary with the recognition collaborators.
//!
//! Rasterizing and recognizing a scanned payslip happens outside this crate.
//! A [`LineSource`] hands over what that step produced, as ordered text
//! lines per page, and [`LineSequence`] concatenates the pages for extraction.

mod dump;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

pub use dump::OcrDump;
#[cfg(feature = "pdf")]
pub use pdf::PdfText;
pub use text::TextDump;

use std::ops::Deref;
use std::path::Path;

use tracing::debug;

use crate::error::SourceError;
use crate::models::config::SourceConfig;

/// Result type for line source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Trait for recognized-text providers.
pub trait LineSource {
    /// Recognized lines, grouped per page in page order.
    fn pages(&self) -> Result<Vec<Vec<String>>>;

    /// Short name of the source kind, for logs.
    fn kind(&self) -> &'static str;
}

/// Ordered lines of one document, concatenated across pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
    page_starts: Vec<usize>,
}

impl LineSequence {
    /// Concatenate pages in order, trimming every line.
    pub fn from_pages(pages: Vec<Vec<String>>) -> Self {
        let mut lines = Vec::new();
        let mut page_starts = Vec::with_capacity(pages.len());

        for page in pages {
            page_starts.push(lines.len());
            lines.extend(page.into_iter().map(|l| l.trim().to_string()));
        }

        Self { lines, page_starts }
    }

    /// Pull every page out of a source.
    pub fn from_source(source: &dyn LineSource) -> Result<Self> {
        let pages = source.pages()?;
        let sequence = Self::from_pages(pages);
        debug!(
            "Loaded {} lines over {} pages from {} source",
            sequence.len(),
            sequence.page_count(),
            source.kind()
        );
        Ok(sequence)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }

    /// Zero-based page holding line `index`.
    pub fn page_of(&self, index: usize) -> Option<usize> {
        if index >= self.lines.len() {
            return None;
        }
        Some(self.page_starts.partition_point(|&start| start <= index) - 1)
    }
}

impl Deref for LineSequence {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.lines
    }
}

impl From<Vec<String>> for LineSequence {
    fn from(lines: Vec<String>) -> Self {
        Self::from_pages(vec![lines])
    }
}

/// Pick a source for a file by its extension.
pub fn open_path(path: &Path, config: &SourceConfig) -> Result<Box<dyn LineSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" | "text" => Ok(Box::new(TextDump::from_file(path, &config.page_separator)?)),
        "json" => Ok(Box::new(OcrDump::from_file(path)?)),
        #[cfg(feature = "pdf")]
        "pdf" => {
            let data = std::fs::read(path)?;
            Ok(Box::new(PdfText::load(&data, config.pdf_password.as_deref())?))
        }
        "png" | "jpg" | "jpeg" | "tiff" | "bmp" => Err(SourceError::Unsupported(format!(
            "{}: image input needs an external OCR pass; provide its text or JSON output",
            path.display()
        ))),
        other => Err(SourceError::Unsupported(format!("file extension {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_pages_concatenate_in_order() {
        let sequence =
            LineSequence::from_pages(vec![page(&[" Basic ", "100"]), page(&["HRA", "50 "])]);

        assert_eq!(sequence.lines(), &["Basic", "100", "HRA", "50"]);
        assert_eq!(sequence.page_count(), 2);
        assert_eq!(sequence.page_of(1), Some(0));
        assert_eq!(sequence.page_of(2), Some(1));
        assert_eq!(sequence.page_of(4), None);
    }

    #[test]
    fn test_empty_pages() {
        let sequence = LineSequence::from_pages(vec![vec![], page(&["Basic"])]);
        assert_eq!(sequence.page_of(0), Some(1));
        assert!(LineSequence::default().is_empty());
    }

    #[test]
    fn test_rejects_images() {
        let err = open_path(Path::new("slip.png"), &SourceConfig::default()).err().unwrap();
        assert!(matches!(err, SourceError::Unsupported(_)));
    }
}
