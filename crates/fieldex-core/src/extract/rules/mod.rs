//! Rule passes that turn OCR text into named fields.
//!
//! Passes run in a fixed order (dynamic keywords, then the document-type
//! pass, then the generic fallback). Each pass only fills fields that are
//! still unset, except rules explicitly marked [`FillMode::Override`].

pub mod dates;
pub mod dynamic;
pub mod form;
pub mod generic;
pub mod id_card;
pub mod labels;
pub mod passport;
pub mod patterns;
pub mod person;

pub use dates::{normalize_date, parse_date, DateExtractor};
pub use dynamic::DynamicKeywordPass;
pub use form::FormPass;
pub use generic::{EmailExtractor, GenericPass, PhoneExtractor};
pub use id_card::IdCardPass;
pub use labels::{LabelIndex, LabelMatcher};
pub use passport::PassportPass;

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::keywords::KeywordDictionary;
use crate::models::config::ExtractionConfig;
use crate::models::fields::FieldValue;

/// Trait for single-field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it was found.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Everything a pass may look at for one extraction call.
pub struct PassContext<'a> {
    /// Full OCR text.
    pub text: &'a str,
    /// Text split into lines (untrimmed).
    pub lines: Vec<&'a str>,
    /// Active keyword dictionary.
    pub dictionary: &'a KeywordDictionary,
    /// Compiled label matchers for the dictionary.
    pub labels: &'a LabelIndex,
    /// Extraction tuning.
    pub config: &'a ExtractionConfig,
}

impl<'a> PassContext<'a> {
    pub fn new(
        text: &'a str,
        dictionary: &'a KeywordDictionary,
        labels: &'a LabelIndex,
        config: &'a ExtractionConfig,
    ) -> Self {
        Self {
            text,
            lines: text.lines().collect(),
            dictionary,
            labels,
            config,
        }
    }

    /// Trimmed, non-empty lines in document order.
    pub fn non_empty_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty())
    }
}

/// Fields collected so far in one extraction call.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Set `field` only if it is unset and `value` is non-empty.
    ///
    /// Returns whether the value was stored.
    pub fn fill(&mut self, field: &str, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        if value.is_empty() || self.contains(field) {
            return false;
        }
        trace!("Filled {} = {:?}", field, value);
        self.fields.insert(field.to_string(), value);
        true
    }

    /// Set `field` unconditionally (empty values are ignored).
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        if let Some(previous) = self.fields.get(field) {
            if *previous != value {
                debug!("Overriding {}: {:?} -> {:?}", field, previous, value);
            }
        }
        self.fields.insert(field.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }
}

/// One stage of the extraction pipeline.
pub trait ExtractionPass {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Add fields found in `ctx` to `fields`.
    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap);
}

/// How a rule treats a field that is already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Only set the field if no earlier pass did.
    Fill,
    /// Replace a value set by an earlier pass.
    Override,
}

/// Matcher signature used by rule tables.
pub type Matcher = fn(&PassContext<'_>) -> Option<FieldValue>;

/// A `(field, matcher)` pair in a priority-ordered rule table.
///
/// Rules sharing a `group` are alternatives: the first one that produces a
/// value wins and the rest of the group is skipped.
#[derive(Clone, Copy)]
pub struct Rule {
    pub group: &'static str,
    pub field: &'static str,
    pub mode: FillMode,
    pub matcher: Matcher,
}

impl Rule {
    pub const fn fill(group: &'static str, field: &'static str, matcher: Matcher) -> Self {
        Self {
            group,
            field,
            mode: FillMode::Fill,
            matcher,
        }
    }

    pub const fn overriding(group: &'static str, field: &'static str, matcher: Matcher) -> Self {
        Self {
            group,
            field,
            mode: FillMode::Override,
            matcher,
        }
    }
}

/// Evaluate a rule table in order with first-match-wins per group.
pub fn apply_rules(rules: &[Rule], ctx: &PassContext<'_>, fields: &mut FieldMap) {
    let mut matched: HashSet<&'static str> = HashSet::new();

    for rule in rules {
        if matched.contains(rule.group) {
            continue;
        }
        if rule.mode == FillMode::Fill && fields.contains(rule.field) {
            continue;
        }

        let Some(value) = (rule.matcher)(ctx) else {
            continue;
        };

        match rule.mode {
            FillMode::Fill => {
                fields.fill(rule.field, value);
            }
            FillMode::Override => fields.set(rule.field, value),
        }
        matched.insert(rule.group);
    }
}
