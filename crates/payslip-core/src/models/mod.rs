//! Data models: field catalog, extraction record, configuration.

pub mod catalog;
pub mod config;
pub mod record;

pub use catalog::{CatalogFile, FieldCatalog, FieldSpec, PERIOD_FIELD};
pub use config::PayslipConfig;
pub use record::ExtractionRecord;
