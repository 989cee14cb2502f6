//! Data models and configuration.

pub mod config;
pub mod fields;

pub use config::{ExtractionConfig, FieldexConfig, KeywordConfig, PreprocessConfig};
pub use fields::{DocumentType, ExtractionResult, FieldValue};
