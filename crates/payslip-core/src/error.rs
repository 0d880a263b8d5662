//! Error types for the payslip-core library.
//!
//! Field extraction itself never fails: a field that cannot be resolved is
//! simply absent from the record. These errors only cover the boundary
//! collaborators (line sources, catalog overrides, configuration files).

use thiserror::Error;

/// Main error type for the payslip library.
#[derive(Error, Debug)]
pub enum PayslipError {
    /// Line source error (text dump, OCR dump, PDF).
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Field catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into a line sequence.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and the configured password did not open it.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// The OCR dump is not in a recognized shape.
    #[error("malformed OCR dump: {0}")]
    MalformedDump(String),

    /// The input file type is not supported.
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors found while validating a field catalog.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog declares no fields.
    #[error("catalog has no fields")]
    Empty,

    /// Two fields share an identifier.
    #[error("duplicate field identifier: {0}")]
    DuplicateField(String),

    /// A field declares no aliases.
    #[error("field {0} has no aliases")]
    NoAliases(String),

    /// A field declares an alias that normalizes to nothing.
    #[error("field {0} has a blank alias")]
    BlankAlias(String),

    /// A field reuses the period field's identifier.
    #[error("field identifier {0} is reserved for the period")]
    ReservedIdentifier(String),
}

/// Result type for the payslip library.
pub type Result<T> = std::result::Result<T, PayslipError>;
