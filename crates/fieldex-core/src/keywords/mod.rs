//! Keyword dictionary: canonical field names and the label keywords that
//! trigger them.

mod store;

pub use store::KeywordStore;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Built-in field table, in lookup order.
///
/// Order matters for form-label mapping: the first field owning a keyword
/// contained in the label wins, so `father_name` sits before `name`, and
/// `email`/`expiry_date` sit before `id_number` (whose `id` keyword is a
/// substring of many labels).
pub const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("father_name", &["father's name", "father name", "fathers name", "guardian name", "guardian"]),
    ("mother_name", &["mother's name", "mother name", "mothers name"]),
    ("name", &["student name", "full name", "name", "nombre", "apellido"]),
    ("roll_no", &["roll no", "roll num", "enrollment no", "enrolment no", "registration no", "reg no"]),
    ("class", &["class", "course", "programme", "program", "branch"]),
    ("date_of_birth", &["date of birth", "birth date", "dob", "d.o.b", "born", "fecha de nacimiento"]),
    ("admission_year", &["admission year", "year of admission", "admitted in", "batch"]),
    ("email", &["email", "e-mail", "correo"]),
    (
        "phone",
        &[
            "mobile no", "mobile number", "phone no", "phone number", "contact number", "contact no",
            "phone", "telephone", "mobile", "cell", "teléfono",
        ],
    ),
    ("address", &["address", "street", "city", "state", "dirección"]),
    ("gender", &["gender", "sex"]),
    ("nationality", &["nationality", "citizenship", "citizen of"]),
    ("expiry_date", &["date of expiry", "expiry date", "expiry", "expiration", "valid until", "valid upto", "expires"]),
    ("issue_date", &["date of issue", "issue date", "issued on"]),
    ("passport_number", &["passport no", "passport number"]),
    ("id_number", &["id no", "id number", "identification", "document number", "license", "id"]),
];

/// Keywords registered for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeywords {
    /// Canonical field name.
    pub field: String,
    /// Trigger keywords, deduplicated, in insertion order.
    pub keywords: Vec<String>,
}

/// Ordered mapping of field name to trigger keywords.
///
/// Each field appears once and each keyword list holds no exact duplicates.
/// Keywords are compared case-sensitively when merging, and matched
/// case-insensitively against text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDictionary {
    entries: Vec<FieldKeywords>,
}

impl KeywordDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary holding only the built-in table.
    pub fn builtin() -> Self {
        let mut dictionary = Self::new();
        for (field, keywords) in BUILTIN_KEYWORDS {
            for keyword in *keywords {
                dictionary.insert(field, keyword);
            }
        }
        dictionary
    }

    /// Built-in table merged with user overrides.
    pub fn with_overrides(overrides: &KeywordDictionary) -> Self {
        let mut dictionary = Self::builtin();
        dictionary.merge(overrides);
        dictionary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(field, keywords)` pairs in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.field.as_str(), e.keywords.as_slice()))
    }

    /// Field names in dictionary order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    /// Keywords for a field.
    pub fn keywords(&self, field: &str) -> Option<&[String]> {
        self.entry(field).map(|e| e.keywords.as_slice())
    }

    /// Whether `keyword` is registered for `field` (exact comparison).
    pub fn contains(&self, field: &str, keyword: &str) -> bool {
        self.entry(field)
            .is_some_and(|e| e.keywords.iter().any(|k| k == keyword))
    }

    /// Append `keyword` to `field`, creating the field if needed.
    ///
    /// Returns `false` if the keyword was already present.
    pub fn insert(&mut self, field: &str, keyword: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => {
                if entry.keywords.iter().any(|k| k == keyword) {
                    return false;
                }
                entry.keywords.push(keyword.to_string());
            }
            None => self.entries.push(FieldKeywords {
                field: field.to_string(),
                keywords: vec![keyword.to_string()],
            }),
        }
        true
    }

    /// Additively merge another dictionary into this one.
    ///
    /// Existing fields keep their keywords and gain any new ones; unknown
    /// fields are appended in `other`'s order. Nothing is ever removed.
    pub fn merge(&mut self, other: &KeywordDictionary) {
        for entry in &other.entries {
            self.ensure_field(&entry.field);
            for keyword in &entry.keywords {
                self.insert(&entry.field, keyword);
            }
        }
    }

    /// Map a form label to a canonical field name.
    ///
    /// Returns the first field (in dictionary order) owning a keyword that is
    /// a substring of the lower-cased label.
    pub fn field_for_label(&self, label: &str) -> Option<&str> {
        let label = label.to_lowercase();
        self.entries
            .iter()
            .find(|e| {
                e.keywords.iter().any(|k| {
                    let k = k.to_lowercase();
                    !k.is_empty() && label.contains(&k)
                })
            })
            .map(|e| e.field.as_str())
    }

    fn ensure_field(&mut self, field: &str) {
        if self.entry(field).is_none() {
            self.entries.push(FieldKeywords {
                field: field.to_string(),
                keywords: Vec::new(),
            });
        }
    }

    fn entry(&self, field: &str) -> Option<&FieldKeywords> {
        self.entries.iter().find(|e| e.field == field)
    }
}

impl Serialize for KeywordDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.field, &entry.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeywordDictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor)
    }
}

struct DictionaryVisitor;

impl<'de> Visitor<'de> for DictionaryVisitor {
    type Value = KeywordDictionary;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field names to keyword arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut dictionary = KeywordDictionary::new();
        while let Some((field, keywords)) = access.next_entry::<String, Vec<String>>()? {
            dictionary.ensure_field(&field);
            for keyword in &keywords {
                dictionary.insert(&field, keyword);
            }
        }
        Ok(dictionary)
    }
}
