//! Plain-text OCR dumps: one recognized line per row.

use std::path::Path;

use super::{LineSource, Result};

/// Recognized text saved as plain text, pages split by a separator.
#[derive(Debug, Clone)]
pub struct TextDump {
    text: String,
    page_separator: String,
}

impl TextDump {
    pub fn new(text: impl Into<String>, page_separator: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_separator: page_separator.into(),
        }
    }

    pub fn from_file(path: &Path, page_separator: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text, page_separator))
    }
}

impl LineSource for TextDump {
    fn pages(&self) -> Result<Vec<Vec<String>>> {
        if self.text.is_empty() {
            return Ok(Vec::new());
        }

        let pages: Vec<&str> = if self.page_separator.is_empty() {
            vec![self.text.as_str()]
        } else {
            self.text.split(self.page_separator.as_str()).collect()
        };

        Ok(pages
            .into_iter()
            .map(|page| page.lines().map(str::to_string).collect())
            .collect())
    }

    fn kind(&self) -> &'static str {
        "text"
    }
}
