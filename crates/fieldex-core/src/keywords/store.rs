//! File-backed persistence for user keyword overrides.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::KeywordDictionary;
use crate::error::KeywordError;

/// JSON file holding user keyword overrides (`{"field": ["keyword", ...]}`).
///
/// The file is read-modify-written without locking; concurrent writers race
/// and the last one wins.
#[derive(Debug, Clone)]
pub struct KeywordStore {
    path: PathBuf,
}

impl KeywordStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the override file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the override file. A missing file yields an empty dictionary.
    pub fn load(&self) -> Result<KeywordDictionary, KeywordError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No keyword override file at {}", self.path.display());
                return Ok(KeywordDictionary::new());
            }
            Err(source) => {
                return Err(KeywordError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| KeywordError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the override file, logging and returning an empty dictionary on
    /// failure.
    pub fn load_or_empty(&self) -> KeywordDictionary {
        self.load().unwrap_or_else(|e| {
            warn!("Ignoring keyword overrides: {}", e);
            KeywordDictionary::new()
        })
    }

    /// Overwrite the override file with `overrides`.
    pub fn save(&self, overrides: &KeywordDictionary) -> Result<(), KeywordError> {
        let content = serde_json::to_string_pretty(overrides)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| KeywordError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| KeywordError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Saved {} keyword override fields to {}",
            overrides.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeywordStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        fs::write(&path, "{\"name\": \"not a list\"}").unwrap();

        let store = KeywordStore::new(&path);
        assert!(matches!(store.load(), Err(KeywordError::Parse { .. })));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeywordStore::new(dir.path().join("nested").join("keywords.json"));

        let mut overrides = KeywordDictionary::new();
        overrides.insert("roll_no", "roll number");
        overrides.insert("blood_group", "blood group");
        store.save(&overrides).unwrap();

        assert_eq!(store.load().unwrap(), overrides);
    }
}
