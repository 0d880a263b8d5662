//! Embedded-text PDFs via lopdf.
//!
//! Scanned payslips carry no text layer and must go through an external OCR
//! pass first; this source covers payslips exported with a text layer.

use lopdf::Document;
use tracing::{debug, warn};

use super::{LineSource, Result};
use crate::error::SourceError;

/// Per-page text of a PDF with a text layer.
pub struct PdfText {
    document: Document,
}

impl PdfText {
    /// Load a PDF, decrypting it with `password` (or the empty password) if needed.
    pub fn load(data: &[u8], password: Option<&str>) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;

        if document.is_encrypted() {
            let password = password.unwrap_or("");
            if document.decrypt(password).is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF");
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

impl LineSource for PdfText {
    fn pages(&self) -> Result<Vec<Vec<String>>> {
        let mut pages = Vec::with_capacity(self.page_count());

        for page in self.document.get_pages().keys() {
            let lines = match self.document.extract_text(&[*page]) {
                Ok(text) => text.lines().map(str::to_string).collect(),
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page, e);
                    Vec::new()
                }
            };
            pages.push(lines);
        }

        Ok(pages)
    }

    fn kind(&self) -> &'static str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pretty_assertions::assert_eq;

    /// A PDF with one line of Courier text per page.
    fn text_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pages_in_order() {
        let data = text_pdf(&["Basic : 1000", "HRA : 500"]);
        let pdf = PdfText::load(&data, None).unwrap();
        assert_eq!(pdf.page_count(), 2);

        let pages: Vec<String> = pdf
            .pages()
            .unwrap()
            .iter()
            .map(|lines| lines.join(" ").trim().to_string())
            .collect();
        assert_eq!(pages, vec!["Basic : 1000", "HRA : 500"]);
    }

    #[test]
    fn test_password_ignored_for_plain_pdf() {
        let data = text_pdf(&["Basic : 1000"]);
        let pdf = PdfText::load(&data, Some("secret")).unwrap();
        assert_eq!(pdf.kind(), "pdf");
        assert_eq!(pdf.page_count(), 1);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = PdfText::load(b"not a pdf", None).err().unwrap();
        assert!(matches!(err, SourceError::Pdf(_)));
    }
}
