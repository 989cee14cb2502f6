//! Core library for extracting structured fields from document OCR text.
//!
//! This crate provides:
//! - A keyword dictionary (built-in table plus user-trained overrides)
//! - Rule passes for ID cards, passports and labelled forms
//! - Date normalization and per-field confidence scoring
//! - OCR text cleanup and image preprocessing for an external OCR engine

pub mod error;
pub mod extract;
pub mod keywords;
pub mod models;
pub mod ocr;

pub use error::{FieldexError, KeywordError, Result};
pub use extract::{normalize_date, DocumentExtractor};
pub use keywords::{KeywordDictionary, KeywordStore};
pub use models::{DocumentType, ExtractionResult, FieldValue, FieldexConfig};
pub use ocr::clean_ocr_text;
#[cfg(feature = "preprocess")]
pub use ocr::ImagePreprocessor;
