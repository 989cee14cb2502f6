//! Compiled `keyword: value` line matchers for the keyword dictionary.

use regex::Regex;
use tracing::warn;

use crate::keywords::KeywordDictionary;

/// Matches a line that starts with one keyword and captures the rest.
///
/// The keyword's words may be separated by any whitespace, a keyword ending
/// in an alphanumeric character must end on a word boundary, and an optional
/// run of `:`, `.`, `-` and whitespace separates it from the value.
///
/// A one-word keyword with no `:`, `.` or `-` after it only matches when the
/// value holds a digit, so heading lines such as `ID CARD` or
/// `STATE UNIVERSITY` are not read as labels.
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    regex: Regex,
    single_word: bool,
}

impl LabelMatcher {
    /// Compile a matcher, or `None` for an empty keyword.
    pub fn new(field: &str, keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }

        let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
        let boundary = if keyword.chars().last().is_some_and(char::is_alphanumeric) {
            r"\b"
        } else {
            ""
        };
        let pattern = format!(r"(?i)^{}{}([\s:.\-]*)(.*)$", words.join(r"\s+"), boundary);

        match Regex::new(&pattern) {
            Ok(regex) => Some(Self {
                regex,
                single_word: words.len() == 1,
            }),
            Err(e) => {
                warn!("Skipping keyword {:?} for {}: {}", keyword, field, e);
                None
            }
        }
    }

    /// Value after the label (possibly empty), if `line` starts with it.
    fn value<'t>(&self, line: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(line.trim())?;
        let separator = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str().trim();

        let separated = separator.contains([':', '.', '-']);
        if self.single_word && !separated && !value.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(value)
    }

    /// Whether the trimmed line starts with this label.
    pub fn is_match(&self, line: &str) -> bool {
        self.value(line).is_some()
    }

    /// Trimmed, non-empty value following the label on `line`.
    pub fn capture<'t>(&self, line: &'t str) -> Option<&'t str> {
        self.value(line).filter(|value| !value.is_empty())
    }
}

/// Label matchers for every dictionary field, in dictionary order.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    fields: Vec<(String, Vec<LabelMatcher>)>,
}

impl LabelIndex {
    pub fn build(dictionary: &KeywordDictionary) -> Self {
        let fields = dictionary
            .iter()
            .map(|(field, keywords)| {
                let matchers = keywords
                    .iter()
                    .filter_map(|keyword| LabelMatcher::new(field, keyword))
                    .collect();
                (field.to_string(), matchers)
            })
            .collect();
        Self { fields }
    }

    /// `(field, matchers)` pairs in dictionary order; matchers in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LabelMatcher])> {
        self.fields
            .iter()
            .map(|(field, matchers)| (field.as_str(), matchers.as_slice()))
    }

    pub fn matchers(&self, field: &str) -> &[LabelMatcher] {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, matchers)| matchers.as_slice())
            .unwrap_or_default()
    }

    /// Whether `line` starts with a label belonging to a field other than `field`.
    pub fn matches_other_field(&self, line: &str, field: &str) -> bool {
        self.iter()
            .filter(|(f, _)| *f != field)
            .any(|(_, matchers)| matchers.iter().any(|m| m.is_match(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capture_after_separators() {
        let matcher = LabelMatcher::new("date_of_birth", "dob").unwrap();
        assert_eq!(matcher.capture("  DOB :- 04/12/1990 "), Some("04/12/1990"));
        assert_eq!(matcher.capture("dob"), None);
        assert_eq!(matcher.capture("Address: dob 1990"), None);
    }

    #[test]
    fn test_word_boundary() {
        let matcher = LabelMatcher::new("id_number", "id").unwrap();
        assert_eq!(matcher.capture("ID: 4471"), Some("4471"));
        assert_eq!(matcher.capture("Identity Card"), None);
    }

    #[test]
    fn test_single_word_keyword_needs_separator_or_digit() {
        let id = LabelMatcher::new("id_number", "id").unwrap();
        assert_eq!(id.capture("ID CARD"), None);
        assert!(!id.is_match("ID CARD"));
        assert_eq!(id.capture("ID 4471"), Some("4471"));
        assert_eq!(id.capture("ID - ABC"), Some("ABC"));

        let state = LabelMatcher::new("address", "state").unwrap();
        assert_eq!(state.capture("STATE UNIVERSITY"), None);
        assert_eq!(state.capture("State: Maharashtra"), Some("Maharashtra"));

        let name = LabelMatcher::new("name", "student name").unwrap();
        assert_eq!(name.capture("Student Name Asha Verma"), Some("Asha Verma"));
    }

    #[test]
    fn test_multi_word_and_punctuated_keywords() {
        let matcher = LabelMatcher::new("roll_no", "roll number").unwrap();
        assert_eq!(matcher.capture("Roll   Number: 24/94076"), Some("24/94076"));

        let matcher = LabelMatcher::new("date_of_birth", "d.o.b").unwrap();
        assert_eq!(matcher.capture("D.O.B. 1 Jan 2000"), Some("1 Jan 2000"));
        assert_eq!(matcher.capture("DxOxB 1 Jan 2000"), None);
    }

    #[test]
    fn test_empty_keyword_is_rejected() {
        assert!(LabelMatcher::new("name", "   ").is_none());
    }

    #[test]
    fn test_index_follows_dictionary_order() {
        let mut dictionary = KeywordDictionary::new();
        dictionary.insert("phone", "mobile");
        dictionary.insert("email", "email");
        dictionary.insert("email", "e-mail");

        let index = LabelIndex::build(&dictionary);
        let fields: Vec<&str> = index.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["phone", "email"]);
        assert_eq!(index.matchers("email").len(), 2);
        assert!(index.matchers("missing").is_empty());
    }

    #[test]
    fn test_matches_other_field() {
        let index = LabelIndex::build(&KeywordDictionary::builtin());
        assert!(index.matches_other_field("Phone: 555 123 4567", "address"));
        assert!(!index.matches_other_field("Address: 12 Park Road", "address"));
        assert!(!index.matches_other_field("12 Park Road Pune", "address"));
    }
}
