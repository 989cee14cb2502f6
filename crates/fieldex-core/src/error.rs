//! Error types for the fieldex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the fieldex library.
#[derive(Error, Debug)]
pub enum FieldexError {
    /// Keyword dictionary load/save error.
    #[error("keyword error: {0}")]
    Keywords(#[from] KeywordError),

    /// Image processing error.
    #[cfg(feature = "preprocess")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the keyword override file.
#[derive(Error, Debug)]
pub enum KeywordError {
    /// The override file could not be read.
    #[error("failed to read keyword file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The override file is not a JSON object of string arrays.
    #[error("failed to parse keyword file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The override file could not be written.
    #[error("failed to write keyword file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary could not be serialized.
    #[error("failed to serialize keywords: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the fieldex library.
pub type Result<T> = std::result::Result<T, FieldexError>;
