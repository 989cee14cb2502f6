//! Helpers around the external OCR engine: input image preparation and
//! output text cleanup.

mod cleanup;
#[cfg(feature = "preprocess")]
mod preprocessing;

pub use cleanup::clean_ocr_text;
#[cfg(feature = "preprocess")]
pub use preprocessing::ImagePreprocessor;
