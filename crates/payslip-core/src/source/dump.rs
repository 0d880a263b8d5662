//! JSON OCR dumps.
//!
//! Accepted shapes:
//! - `[["line", ...], ...]` - pages of lines;
//! - `{"pages": [["line", ...], ...]}`;
//! - PaddleOCR results, where each line is `[box, ["text", score]]`.
//!   The score is ignored.

use std::path::Path;

use serde::Deserialize;

use super::{LineSource, Result};
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpLine {
    Text(String),
    Recognized(serde_json::Value, (String, f64)),
}

impl DumpLine {
    fn into_text(self) -> String {
        match self {
            DumpLine::Text(text) => text,
            DumpLine::Recognized(_, (text, _)) => text,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpShape {
    Pages(Vec<Option<Vec<DumpLine>>>),
    Wrapped { pages: Vec<Option<Vec<DumpLine>>> },
}

/// Recognized text saved as JSON by an OCR run.
#[derive(Debug, Clone)]
pub struct OcrDump {
    pages: Vec<Vec<String>>,
}

impl OcrDump {
    pub fn from_json(json: &str) -> Result<Self> {
        let shape: DumpShape =
            serde_json::from_str(json).map_err(|e| SourceError::MalformedDump(e.to_string()))?;

        let raw = match shape {
            DumpShape::Pages(pages) | DumpShape::Wrapped { pages } => pages,
        };

        // PaddleOCR reports a page without text as null.
        let pages: Vec<Vec<String>> = raw
            .into_iter()
            .map(|page| {
                page.unwrap_or_default()
                    .into_iter()
                    .map(DumpLine::into_text)
                    .collect()
            })
            .collect();

        Ok(Self { pages })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl LineSource for OcrDump {
    fn pages(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.pages.clone())
    }

    fn kind(&self) -> &'static str {
        "ocr-json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_pages() {
        let dump = OcrDump::from_json(r#"[["Basic", "100"], ["HRA"]]"#).unwrap();
        assert_eq!(
            dump.pages().unwrap(),
            vec![vec!["Basic".to_string(), "100".to_string()], vec!["HRA".to_string()]]
        );
    }

    #[test]
    fn test_wrapped_pages() {
        let dump = OcrDump::from_json(r#"{"pages": [["Basic"]]}"#).unwrap();
        assert_eq!(dump.pages().unwrap(), vec![vec!["Basic".to_string()]]);
    }

    #[test]
    fn test_paddle_result() {
        let json = r#"[
            [
                [[[10, 10], [90, 10], [90, 30], [10, 30]], ["Basic", 0.99]],
                [[[10, 40], [90, 40], [90, 60], [10, 60]], ["25,000.00", 0.97]]
            ],
            null
        ]"#;
        let dump = OcrDump::from_json(json).unwrap();
        assert_eq!(
            dump.pages().unwrap(),
            vec![vec!["Basic".to_string(), "25,000.00".to_string()], vec![]]
        );
    }

    #[test]
    fn test_malformed() {
        let err = OcrDump::from_json(r#"{"lines": 3}"#).unwrap_err();
        assert!(matches!(err, SourceError::MalformedDump(_)));
    }
}
