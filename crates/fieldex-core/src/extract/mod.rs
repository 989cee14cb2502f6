//! Field extraction from OCR text.

pub mod confidence;
mod extractor;
pub mod rules;

pub use confidence::field_confidence;
pub use extractor::DocumentExtractor;
pub use rules::{normalize_date, parse_date, ExtractionPass, FieldExtractor};
