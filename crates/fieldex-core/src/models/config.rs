//! Configuration structures for field extraction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::fields::DocumentType;
use crate::error::{FieldexError, Result};

/// Main configuration for fieldex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldexConfig {
    /// Keyword dictionary configuration.
    pub keywords: KeywordConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Image preprocessing configuration.
    pub preprocess: PreprocessConfig,
}

/// Keyword dictionary configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Path of the user-editable keyword override file.
    ///
    /// When unset, callers pick a platform default.
    pub override_path: Option<PathBuf>,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Document type used when the caller gives none.
    pub default_document_type: DocumentType,

    /// Run OCR text cleanup before extraction.
    pub clean_ocr_text: bool,

    /// Number of leading non-empty lines searched for an upper-case name.
    pub name_scan_lines: usize,

    /// Maximum number of lines joined into an address.
    pub max_address_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_document_type: DocumentType::General,
            clean_ocr_text: true,
            name_scan_lines: 5,
            max_address_lines: 3,
        }
    }
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Images whose shorter side is below this are upscaled to it.
    pub min_dimension: u32,

    /// Gaussian blur sigma applied before contrast enhancement (0 = off).
    pub blur_sigma: f32,

    /// Contrast factor (1.0 = unchanged).
    pub contrast: f32,

    /// Apply a 3x3 sharpening kernel.
    pub sharpen: bool,

    /// Binarize with an adaptive threshold.
    pub threshold: bool,

    /// Adaptive threshold block size in pixels.
    pub threshold_block_size: u32,

    /// Value subtracted from the local mean.
    pub threshold_offset: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_dimension: 2000,
            blur_sigma: 1.0,
            contrast: 2.0,
            sharpen: true,
            threshold: false,
            threshold_block_size: 15,
            threshold_offset: 5,
        }
    }
}

impl FieldexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FieldexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FieldexError::Config(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a dotted key such as `extraction.max_address_lines`.
    pub fn get(&self, key: &str) -> Result<serde_json::Value> {
        let json = serde_json::to_value(self).map_err(|e| FieldexError::Config(e.to_string()))?;

        let mut current = &json;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| FieldexError::Config(format!("unknown key: {}", key)))?;
        }
        Ok(current.clone())
    }

    /// Set a dotted key. `value` is parsed as JSON, falling back to a plain
    /// string, and the result must still be a valid configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<serde_json::Value> {
        let parsed: serde_json::Value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

        let mut json = serde_json::to_value(&*self).map_err(|e| FieldexError::Config(e.to_string()))?;

        let (parents, last) = match key.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, key),
        };

        let mut current = &mut json;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current
                .get_mut(part)
                .ok_or_else(|| FieldexError::Config(format!("unknown key: {}", key)))?;
        }

        let section = current
            .as_object_mut()
            .ok_or_else(|| FieldexError::Config(format!("cannot set value at non-object path: {}", key)))?;
        if !section.contains_key(last) {
            return Err(FieldexError::Config(format!("unknown key: {}", key)));
        }
        section.insert(last.to_string(), parsed.clone());

        *self = serde_json::from_value(json)
            .map_err(|e| FieldexError::Config(format!("invalid value for {}: {}", key, e)))?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FieldexConfig =
            serde_json::from_str(r#"{"extraction": {"default_document_type": "passport"}}"#)
                .unwrap();

        assert_eq!(config.extraction.default_document_type, DocumentType::Passport);
        assert_eq!(config.extraction.name_scan_lines, 5);
        assert_eq!(config.preprocess.min_dimension, 2000);
        assert!(config.keywords.override_path.is_none());
    }

    #[test]
    fn test_unknown_document_type_falls_back_to_general() {
        let config: FieldexConfig =
            serde_json::from_str(r#"{"extraction": {"default_document_type": "driving_licence"}}"#)
                .unwrap();
        assert_eq!(config.extraction.default_document_type, DocumentType::General);

        let config: FieldexConfig =
            serde_json::from_str(r#"{"extraction": {"default_document_type": "ID-Card"}}"#).unwrap();
        assert_eq!(config.extraction.default_document_type, DocumentType::IdCard);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FieldexConfig::default();
        config.extraction.max_address_lines = 2;
        config.save(&path).unwrap();

        let loaded = FieldexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.max_address_lines, 2);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FieldexConfig::load_or_default(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.extraction.max_address_lines, 3);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(FieldexConfig::from_file(&path), Err(FieldexError::Config(_))));
    }

    #[test]
    fn test_get_and_set_dotted_keys() {
        let mut config = FieldexConfig::default();
        assert_eq!(config.get("preprocess.min_dimension").unwrap(), 2000);

        config.set("extraction.default_document_type", "id_card").unwrap();
        assert_eq!(config.extraction.default_document_type, DocumentType::IdCard);

        config.set("keywords.override_path", "/tmp/kw.json").unwrap();
        assert_eq!(config.keywords.override_path, Some(PathBuf::from("/tmp/kw.json")));

        assert!(config.get("extraction.nope").is_err());
        assert!(config.set("extraction.nope", "1").is_err());
        assert!(config.set("preprocess.min_dimension", "big").is_err());
        assert_eq!(config.preprocess.min_dimension, 2000);
    }
}
