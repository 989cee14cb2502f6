//! Extraction result data models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of document the OCR text came from.
///
/// Deserializes through [`DocumentType::from_tag`], so unknown tags read
/// from a config file or result become `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum DocumentType {
    /// Student or national identity card.
    IdCard,
    /// Passport data page.
    Passport,
    /// Labelled form (`Label: value` lines).
    Form,
    /// Anything else.
    #[default]
    General,
}

impl DocumentType {
    /// Parse a document type tag. Unknown tags fall back to `General`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "id_card" | "idcard" | "id" => DocumentType::IdCard,
            "passport" => DocumentType::Passport,
            "form" => DocumentType::Form,
            _ => DocumentType::General,
        }
    }

    /// Canonical tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdCard => "id_card",
            DocumentType::Passport => "passport",
            DocumentType::Form => "form",
            DocumentType::General => "general",
        }
    }
}

impl From<String> for DocumentType {
    fn from(tag: String) -> Self {
        DocumentType::from_tag(&tag)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single string value.
    Text(String),
    /// Multi-valued field, such as every date found in the text.
    List(Vec<String>),
}

impl FieldValue {
    /// The value as a string slice, if it is a single value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The value as a list, if it is multi-valued.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Flatten to a single display string (lists joined with `"; "`).
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join("; "),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Result of one `extract_all_fields` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted values keyed by field name.
    pub fields: BTreeMap<String, FieldValue>,

    /// Confidence score (0.0 - 1.0) for each entry in `fields`.
    pub confidence: BTreeMap<String, f32>,

    /// Document type whose rules were applied.
    pub document_type: DocumentType,
}

impl ExtractionResult {
    /// Single-valued field by name.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_text)
    }

    /// Confidence for a field, if it was extracted.
    pub fn confidence_of(&self, field: &str) -> Option<f32> {
        self.confidence.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_from_tag() {
        assert_eq!(DocumentType::from_tag("id_card"), DocumentType::IdCard);
        assert_eq!(DocumentType::from_tag("ID-Card"), DocumentType::IdCard);
        assert_eq!(DocumentType::from_tag("passport"), DocumentType::Passport);
        assert_eq!(DocumentType::from_tag("form"), DocumentType::Form);
        assert_eq!(DocumentType::from_tag("general"), DocumentType::General);
        assert_eq!(DocumentType::from_tag("invoice"), DocumentType::General);
    }

    #[test]
    fn test_result_serializes_flat_values() {
        let mut result = ExtractionResult {
            document_type: DocumentType::IdCard,
            ..Default::default()
        };
        result.fields.insert("name".into(), "Jane Doe".into());
        result
            .fields
            .insert("dates".into(), vec!["01/02/2000".to_string()].into());
        result.confidence.insert("name".into(), 0.8);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fields"]["name"], "Jane Doe");
        assert_eq!(json["fields"]["dates"][0], "01/02/2000");
        assert_eq!(json["document_type"], "id_card");
    }
}
