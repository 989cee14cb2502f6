//! Rule-based document field extractor.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::confidence::field_confidence;
use super::rules::{
    DynamicKeywordPass, ExtractionPass, FieldMap, FormPass, GenericPass, IdCardPass, LabelIndex,
    PassContext, PassportPass,
};
use crate::keywords::{KeywordDictionary, KeywordStore};
use crate::models::config::{ExtractionConfig, FieldexConfig};
use crate::models::fields::{DocumentType, ExtractionResult};

/// Maps OCR text to named fields using a keyword dictionary and rule passes.
///
/// Extraction takes `&self` and has no side effects. The dictionary can be
/// extended with [`DocumentExtractor::add_keyword`], which also persists the
/// accumulated overrides when the extractor was built from a store.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    dictionary: KeywordDictionary,
    overrides: KeywordDictionary,
    labels: LabelIndex,
    store: Option<KeywordStore>,
    config: ExtractionConfig,
}

impl DocumentExtractor {
    /// Extractor using the built-in keywords only, without persistence.
    pub fn new() -> Self {
        Self::with_dictionary(KeywordDictionary::builtin())
    }

    /// Extractor using exactly `dictionary`, without persistence.
    pub fn with_dictionary(dictionary: KeywordDictionary) -> Self {
        Self {
            labels: LabelIndex::build(&dictionary),
            dictionary,
            overrides: KeywordDictionary::new(),
            store: None,
            config: ExtractionConfig::default(),
        }
    }

    /// Extractor using the built-in keywords merged with the overrides in
    /// `store`. An unreadable override file is logged and ignored.
    pub fn from_store(store: KeywordStore) -> Self {
        let overrides = store.load_or_empty();
        let dictionary = KeywordDictionary::with_overrides(&overrides);
        info!(
            "Loaded {} keyword fields ({} from {})",
            dictionary.len(),
            overrides.len(),
            store.path().display()
        );

        Self {
            labels: LabelIndex::build(&dictionary),
            dictionary,
            overrides,
            store: Some(store),
            config: ExtractionConfig::default(),
        }
    }

    /// Extractor configured from a [`FieldexConfig`].
    pub fn from_config(config: &FieldexConfig) -> Self {
        let extractor = match &config.keywords.override_path {
            Some(path) => Self::from_store(KeywordStore::new(path)),
            None => Self::new(),
        };
        extractor.with_config(config.extraction.clone())
    }

    /// Set extraction tuning.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// The live dictionary: built-in keywords plus every override.
    pub fn keyword_dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    /// User-added keywords only.
    pub fn overrides(&self) -> &KeywordDictionary {
        &self.overrides
    }

    /// Extract every recognisable field from `text`.
    ///
    /// Passes run as: dictionary keywords, then the `document_type` rules,
    /// then the generic fallback.
    pub fn extract_all_fields(&self, text: &str, document_type: DocumentType) -> ExtractionResult {
        let start = Instant::now();
        info!(
            "Extracting {} fields from {} characters of text",
            document_type,
            text.len()
        );

        let ctx = PassContext::new(text, &self.dictionary, &self.labels, &self.config);
        let mut fields = FieldMap::new();

        for pass in Self::passes(document_type) {
            let before = fields.len();
            pass.apply(&ctx, &mut fields);
            debug!(
                "{} pass added {} fields",
                pass.name(),
                fields.len().saturating_sub(before)
            );
        }

        let fields = fields.into_inner();
        let confidence = fields
            .iter()
            .map(|(name, value)| (name.clone(), field_confidence(name, value)))
            .collect();

        info!(
            "Extracted {} fields in {}ms",
            fields.len(),
            start.elapsed().as_millis()
        );

        ExtractionResult {
            fields,
            confidence,
            document_type,
        }
    }

    fn passes(document_type: DocumentType) -> Vec<&'static dyn ExtractionPass> {
        let mut passes: Vec<&'static dyn ExtractionPass> = vec![&DynamicKeywordPass];
        match document_type {
            DocumentType::IdCard => passes.push(&IdCardPass),
            DocumentType::Passport => passes.push(&PassportPass),
            DocumentType::Form => passes.push(&FormPass),
            DocumentType::General => {}
        }
        passes.push(&GenericPass);
        passes
    }

    /// Teach the extractor a new label keyword for `field`.
    ///
    /// Both values are trimmed and lower-cased; empty input returns `false`.
    /// With a store, the on-disk overrides are re-read, unioned with the
    /// in-memory ones and written back; a failed re-read saves the in-memory
    /// set alone, and a failed write returns `false`.
    pub fn add_keyword(&mut self, field: &str, keyword: &str) -> bool {
        let field = field.trim().to_lowercase();
        let keyword = keyword.trim().to_lowercase();
        if field.is_empty() || keyword.is_empty() {
            debug!("Ignoring empty keyword for field {:?}", field);
            return false;
        }

        if self.dictionary.insert(&field, &keyword) {
            self.labels = LabelIndex::build(&self.dictionary);
        }
        self.overrides.insert(&field, &keyword);

        let Some(store) = &self.store else {
            return true;
        };

        let mut merged = match store.load() {
            Ok(on_disk) => on_disk,
            Err(e) => {
                warn!("Could not re-read keyword overrides, saving in-memory set only: {}", e);
                KeywordDictionary::new()
            }
        };
        merged.merge(&self.overrides);

        if let Err(e) = store.save(&merged) {
            warn!("Failed to save keyword {:?} for {}: {}", keyword, field, e);
            return false;
        }

        info!("Added keyword {:?} to {}", keyword, field);
        self.dictionary.merge(&merged);
        self.labels = LabelIndex::build(&self.dictionary);
        self.overrides = merged;
        true
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::FieldValue;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_labelled_dob() {
        let extractor = DocumentExtractor::new();
        for document_type in [DocumentType::General, DocumentType::IdCard, DocumentType::Passport] {
            let result = extractor.extract_all_fields("Name: Asha Verma\nDOB: 04/12/1990", document_type);
            assert_eq!(result.text("date_of_birth"), Some("1990-04-12"));
        }
    }

    #[test]
    fn test_dob_is_earliest_date_without_label() {
        let extractor = DocumentExtractor::new();
        let text = "ASHA VERMA\nIssued 05/06/2015\nValid 2030-01-01\n12 Feb 1999";
        let result = extractor.extract_all_fields(text, DocumentType::IdCard);
        assert_eq!(result.text("date_of_birth"), Some("1999-02-12"));
    }

    #[test]
    fn test_confidence_is_bounded() {
        let extractor = DocumentExtractor::new();
        let text = "Student Name: Asha Verma\nEmail: asha@college.edu\nPhone: 555-123-4567\nDOB: 04/12/1990\nIssued 2019-01-01";

        for document_type in [
            DocumentType::General,
            DocumentType::IdCard,
            DocumentType::Passport,
            DocumentType::Form,
        ] {
            let result = extractor.extract_all_fields(text, document_type);
            assert_eq!(result.fields.len(), result.confidence.len());
            for (field, score) in &result.confidence {
                assert!((0.0..=1.0).contains(score), "{field}: {score}");
            }
        }
    }

    #[test]
    fn test_trained_keyword_is_used_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_keywords.json");
        let text = "Roll Number: 24/94076";

        let mut extractor = DocumentExtractor::from_store(KeywordStore::new(&path));
        let before = extractor.extract_all_fields(text, DocumentType::General);
        assert_eq!(before.text("roll_no"), None);

        assert!(extractor.add_keyword("roll_no", "Roll Number "));
        let after = extractor.extract_all_fields(text, DocumentType::General);
        assert_eq!(after.text("roll_no"), Some("24/94076"));

        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["roll_no"][0], "roll number");

        let reloaded = DocumentExtractor::from_store(KeywordStore::new(&path));
        assert!(reloaded.keyword_dictionary().contains("roll_no", "roll number"));
    }

    #[test]
    fn test_add_keyword_keeps_entries_written_by_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_keywords.json");

        let mut extractor = DocumentExtractor::from_store(KeywordStore::new(&path));
        fs::write(&path, r#"{"phone": ["cell no"]}"#).unwrap();

        assert!(extractor.add_keyword("blood_group", "blood group"));

        let saved = KeywordStore::new(&path).load().unwrap();
        assert!(saved.contains("phone", "cell no"));
        assert!(saved.contains("blood_group", "blood group"));
        assert!(extractor.keyword_dictionary().contains("phone", "cell no"));
    }

    #[test]
    fn test_unreadable_overrides_are_replaced_by_in_memory_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_keywords.json");
        fs::write(&path, r#"{"roll_no": ["roll number"]}"#).unwrap();

        let mut extractor = DocumentExtractor::from_store(KeywordStore::new(&path));
        fs::write(&path, "{ not json").unwrap();

        assert!(extractor.add_keyword("blood_group", "Blood Group"));

        let saved = KeywordStore::new(&path).load().unwrap();
        assert!(saved.contains("roll_no", "roll number"));
        assert!(saved.contains("blood_group", "blood group"));
        assert_eq!(saved.len(), 2);
        assert_eq!(saved, *extractor.overrides());
    }

    #[test]
    fn test_add_keyword_without_store() {
        let mut extractor = DocumentExtractor::new();
        assert!(extractor.add_keyword("blood_group", "Blood Group"));
        assert!(extractor.keyword_dictionary().contains("blood_group", "blood group"));
        assert!(!extractor.add_keyword("blood_group", "   "));
        assert!(!extractor.add_keyword("", "group"));

        let result = extractor.extract_all_fields("Blood Group: O+", DocumentType::General);
        assert_eq!(result.text("blood_group"), Some("O+"));
    }

    #[test]
    fn test_add_keyword_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let mut extractor = DocumentExtractor::from_store(KeywordStore::new(dir.path()));
        assert!(!extractor.add_keyword("roll_no", "roll number"));
    }

    #[test]
    fn test_type_rules_fill_but_do_not_replace_keyword_values() {
        let extractor = DocumentExtractor::new();
        let text = "Nombre: Priya Nair\nASHA VERMA\nSex: F";

        let id_card = extractor.extract_all_fields(text, DocumentType::IdCard);
        assert_eq!(id_card.text("name"), Some("Priya Nair"));
        // gender is an id card override
        assert_eq!(id_card.text("gender"), Some("Female"));

        let passport = extractor.extract_all_fields(text, DocumentType::Passport);
        assert_eq!(passport.text("name"), Some("Priya Nair"));
        assert_eq!(passport.text("gender"), Some("F"));
    }

    #[test]
    fn test_accented_values_are_kept_whole() {
        let extractor = DocumentExtractor::new();

        let id_card = extractor.extract_all_fields("Roll No: 12 Name: José Pérez\nSex: M", DocumentType::IdCard);
        assert_eq!(id_card.text("name"), Some("José Pérez"));

        let passport = extractor.extract_all_fields("Sex: M Nationality: Español", DocumentType::Passport);
        assert_eq!(passport.text("nationality"), Some("Español"));
    }

    #[test]
    fn test_numbered_phone_label() {
        let extractor = DocumentExtractor::new();
        let result = extractor.extract_all_fields("ID CARD\nASHA VERMA\nMobile No: 9876543210", DocumentType::IdCard);
        assert_eq!(result.text("phone"), Some("9876543210"));
        assert_eq!(result.text("name"), Some("Asha Verma"));
        assert_ne!(result.text("id_number"), Some("CARD"));
    }

    #[test]
    fn test_heading_lines_are_not_labels() {
        let extractor = DocumentExtractor::new();
        let result = extractor.extract_all_fields("STATE UNIVERSITY\nID CARD\nASHA VERMA", DocumentType::General);
        assert_eq!(result.text("address"), None);
        assert_eq!(result.text("id_number"), None);
    }

    #[test]
    fn test_form_student_name() {
        let extractor = DocumentExtractor::new();
        let result = extractor.extract_all_fields("Applicant -\nStudent Name: Asha Verma", DocumentType::Form);
        assert_eq!(result.text("name"), Some("Asha Verma"));
        assert_eq!(result.document_type, DocumentType::Form);
    }

    #[test]
    fn test_unknown_document_type_reports_general() {
        let extractor = DocumentExtractor::new();
        let result = extractor.extract_all_fields(
            "reach me at a@b.co on 01/02/2020",
            DocumentType::from_tag("invoice"),
        );
        assert_eq!(result.document_type, DocumentType::General);
        assert_eq!(result.text("email"), Some("a@b.co"));
        assert_eq!(
            result.fields.get("dates"),
            Some(&FieldValue::List(vec!["01/02/2020".to_string()]))
        );
        assert!((result.confidence_of("email").unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_text() {
        let result = DocumentExtractor::new().extract_all_fields("", DocumentType::IdCard);
        assert!(result.is_empty());
        assert!(result.confidence.is_empty());
    }
}
