//! Fallback rules applied to every document type.

use super::dates::DateExtractor;
use super::patterns::{EMAIL, PHONE};
use super::{apply_rules, ExtractionMatch, ExtractionPass, FieldExtractor, FieldMap, PassContext, Rule};
use crate::models::fields::FieldValue;

/// Generic rule table. Runs last and only fills.
pub const GENERIC_RULES: &[Rule] = &[
    Rule::fill("email", "email", email),
    Rule::fill("phone", "phone", phone),
    Rule::fill("dates", "dates", dates),
];

/// Email address extractor.
pub struct EmailExtractor;

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        EMAIL
            .find_iter(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end()))
            .collect()
    }
}

/// Phone number extractor. Matches are returned as written.
pub struct PhoneExtractor;

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PHONE
            .find_iter(text)
            .map(|m| {
                let value = m.as_str().trim().to_string();
                ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end())
            })
            .collect()
    }
}

pub struct GenericPass;

impl ExtractionPass for GenericPass {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap) {
        apply_rules(GENERIC_RULES, ctx, fields);
    }
}

fn email(ctx: &PassContext<'_>) -> Option<FieldValue> {
    EmailExtractor.extract(ctx.text).map(|m| m.value.into())
}

fn phone(ctx: &PassContext<'_>) -> Option<FieldValue> {
    PhoneExtractor.extract(ctx.text).map(|m| m.value.into())
}

fn dates(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let found = DateExtractor::new().find_all_strings(ctx.text);
    (!found.is_empty()).then(|| found.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::LabelIndex;
    use crate::keywords::KeywordDictionary;
    use crate::models::config::ExtractionConfig;
    use pretty_assertions::assert_eq;

    fn run(text: &str, fields: &mut FieldMap) {
        let dictionary = KeywordDictionary::builtin();
        let labels = LabelIndex::build(&dictionary);
        let config = ExtractionConfig::default();
        let ctx = PassContext::new(text, &dictionary, &labels, &config);
        GenericPass.apply(&ctx, fields);
    }

    #[test]
    fn test_email_extractor() {
        let found = EmailExtractor.extract_all("mail asha.v@college.edu or x@y.io");
        let values: Vec<&str> = found.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["asha.v@college.edu", "x@y.io"]);
        assert_eq!(found[0].position, Some((5, 23)));
    }

    #[test]
    fn test_phone_extractor() {
        let found = PhoneExtractor.extract("Call +1 555-123-4567 today").unwrap();
        assert_eq!(found.value, "+1 555-123-4567");
        assert!(PhoneExtractor.extract("Room 42").is_none());
    }

    #[test]
    fn test_generic_fields() {
        let mut fields = FieldMap::new();
        run(
            "Contact asha.v@college.edu\nTel (555) 123-4567\nFrom 01/02/2020 to 2021-03-04",
            &mut fields,
        );

        assert_eq!(
            fields.get("email").and_then(FieldValue::as_text),
            Some("asha.v@college.edu")
        );
        assert_eq!(
            fields.get("phone").and_then(FieldValue::as_text),
            Some("(555) 123-4567")
        );
        assert_eq!(
            fields.get("dates").and_then(FieldValue::as_list),
            Some(&["01/02/2020".to_string(), "2021-03-04".to_string()][..])
        );
    }

    #[test]
    fn test_generic_only_fills() {
        let mut fields = FieldMap::new();
        fields.fill("email", "keyword@pass.org");
        run("other@mail.com", &mut fields);
        assert_eq!(
            fields.get("email").and_then(FieldValue::as_text),
            Some("keyword@pass.org")
        );
        assert!(!fields.contains("dates"));
    }
}
