//! Dictionary-driven `label: value` pass.

use tracing::debug;

use super::dates::normalize_date;
use super::labels::LabelMatcher;
use super::{ExtractionPass, FieldMap, PassContext};

/// Fills each dictionary field from the first line starting with one of its
/// keywords.
///
/// Fields are visited in dictionary order and keywords in keyword order;
/// for each keyword the lines are scanned in document order.
pub struct DynamicKeywordPass;

impl DynamicKeywordPass {
    fn first_value<'t>(matchers: &[LabelMatcher], lines: &[&'t str]) -> Option<(&'t str, usize)> {
        matchers.iter().find_map(|matcher| {
            lines
                .iter()
                .copied()
                .enumerate()
                .find_map(|(index, line)| matcher.capture(line).map(|value| (value, index)))
        })
    }
}

impl ExtractionPass for DynamicKeywordPass {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap) {
        for (field, matchers) in ctx.labels.iter() {
            if fields.contains(field) {
                continue;
            }

            let Some((value, line)) = Self::first_value(matchers, &ctx.lines) else {
                continue;
            };
            debug!("Keyword match for {} on line {}", field, line + 1);

            if field.contains("date") {
                fields.fill(field, normalize_date(value));
            } else {
                fields.fill(field, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::LabelIndex;
    use crate::keywords::KeywordDictionary;
    use crate::models::config::ExtractionConfig;
    use crate::models::fields::FieldValue;
    use pretty_assertions::assert_eq;

    fn run(dictionary: &KeywordDictionary, text: &str) -> FieldMap {
        let labels = LabelIndex::build(dictionary);
        let config = ExtractionConfig::default();
        let ctx = PassContext::new(text, dictionary, &labels, &config);
        let mut fields = FieldMap::new();
        DynamicKeywordPass.apply(&ctx, &mut fields);
        fields
    }

    fn text(fields: &FieldMap, field: &str) -> Option<String> {
        fields.get(field).and_then(FieldValue::as_text).map(str::to_string)
    }

    #[test]
    fn test_keyword_lines() {
        let fields = run(
            &KeywordDictionary::builtin(),
            "Student Name: Asha Verma\nDOB: 04/12/1990\nMobile - 98765 43210",
        );
        assert_eq!(text(&fields, "name").as_deref(), Some("Asha Verma"));
        assert_eq!(text(&fields, "date_of_birth").as_deref(), Some("1990-04-12"));
        assert_eq!(text(&fields, "phone").as_deref(), Some("98765 43210"));
    }

    #[test]
    fn test_empty_capture_keeps_scanning() {
        let fields = run(&KeywordDictionary::builtin(), "Email:\nemail: a@b.co");
        assert_eq!(text(&fields, "email").as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_keyword_order_beats_line_order() {
        let mut dictionary = KeywordDictionary::new();
        dictionary.insert("phone", "mobile");
        dictionary.insert("phone", "phone");

        let fields = run(&dictionary, "Phone: 111\nMobile: 222");
        assert_eq!(text(&fields, "phone").as_deref(), Some("222"));
    }

    #[test]
    fn test_existing_fields_are_kept() {
        let dictionary = KeywordDictionary::builtin();
        let labels = LabelIndex::build(&dictionary);
        let config = ExtractionConfig::default();
        let ctx = PassContext::new("Name: Second", &dictionary, &labels, &config);

        let mut fields = FieldMap::new();
        fields.fill("name", "First");
        DynamicKeywordPass.apply(&ctx, &mut fields);
        assert_eq!(text(&fields, "name").as_deref(), Some("First"));
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        let fields = run(&KeywordDictionary::builtin(), "Expiry: never");
        assert_eq!(text(&fields, "expiry_date").as_deref(), Some("never"));
    }
}
