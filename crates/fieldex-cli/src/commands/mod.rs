//! Subcommand implementations and shared helpers.

pub mod batch;
pub mod config;
pub mod extract;
pub mod keywords;
pub mod preprocess;

use std::path::{Path, PathBuf};

use fieldex_core::{DocumentExtractor, DocumentType, FieldexConfig};

fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fieldex")
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    app_config_dir().join("config.json")
}

/// Default keyword override file location.
pub fn default_keywords_path() -> PathBuf {
    app_config_dir().join("custom_keywords.json")
}

/// The `--config` path, or the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; the default one may not.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<FieldexConfig> {
    let config = match explicit {
        Some(path) => FieldexConfig::from_file(path)?,
        None => FieldexConfig::load_or_default(&default_config_path())?,
    };
    Ok(config)
}

/// Keyword override file: `--keywords`, then the config file, then the default.
pub fn keywords_path(explicit: Option<&Path>, config: &FieldexConfig) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.keywords.override_path.clone())
        .unwrap_or_else(default_keywords_path)
}

/// Extractor backed by the resolved keyword override file.
pub fn build_extractor(config: &FieldexConfig, keywords: Option<&Path>) -> DocumentExtractor {
    let mut config = config.clone();
    config.keywords.override_path = Some(keywords_path(keywords, &config));
    DocumentExtractor::from_config(&config)
}

/// `--doc-type` if given, otherwise the configured default.
pub fn document_type(tag: Option<&str>, config: &FieldexConfig) -> DocumentType {
    tag.map(DocumentType::from_tag)
        .unwrap_or(config.extraction.default_document_type)
}
