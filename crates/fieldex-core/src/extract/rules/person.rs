//! Matchers for personal details shared by the ID card and passport passes.

use super::dates::{normalize_date, DateExtractor, DATE_FORMAT};
use super::patterns::{DOB_LABELLED, GENDER, NAME_LABELLED, NEXT_LABEL};
use super::PassContext;
use crate::models::fields::FieldValue;

/// Words that mark a heading line rather than a holder's name.
const HEADING_WORDS: &[&str] = &[
    "REPUBLIC",
    "PASSPORT",
    "UNIVERSITY",
    "COLLEGE",
    "INSTITUTE",
    "SCHOOL",
    "CARD",
    "GOVERNMENT",
    "IDENTITY",
    "STATE",
    "UNITED",
    "KINGDOM",
    "MINISTRY",
];

/// Relations whose `... Name:` label belongs to someone else.
const RELATIONS: &[&str] = &["father", "mother", "guardian"];

/// Cut `value` at the start of the next label on the same line.
pub(crate) fn truncate_at_next_label(value: &str) -> &str {
    let value = match NEXT_LABEL.find(value) {
        Some(m) => &value[..m.start()],
        None => value,
    };
    value.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '.' | ',' | '-'))
}

/// Capitalize the first letter of each word and lower-case the rest.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Name: ...` on any line, ignoring father's/mother's/guardian's names.
pub fn labelled_name(ctx: &PassContext<'_>) -> Option<FieldValue> {
    ctx.lines.iter().find_map(|line| {
        NAME_LABELLED.captures_iter(line).find_map(|caps| {
            let label_start = caps.get(0)?.start();
            let preceding = line[..label_start].to_lowercase();
            let previous_word = preceding.split_whitespace().last().unwrap_or("");
            if RELATIONS.iter().any(|r| previous_word.contains(r)) {
                return None;
            }

            let value = truncate_at_next_label(caps.get(1)?.as_str()).trim();
            (!value.is_empty()).then(|| FieldValue::from(value))
        })
    })
}

fn looks_like_name_line(line: &str) -> bool {
    if line.contains(':') || line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if !line.chars().any(char::is_uppercase) || line.chars().any(char::is_lowercase) {
        return false;
    }

    let words = line.split_whitespace().count();
    if !(2..=4).contains(&words) {
        return false;
    }

    !line
        .split(|c: char| !c.is_alphabetic())
        .any(|word| HEADING_WORDS.contains(&word))
}

/// A short, fully upper-case line near the top of the document.
pub fn uppercase_name(ctx: &PassContext<'_>) -> Option<FieldValue> {
    ctx.non_empty_lines()
        .take(ctx.config.name_scan_lines)
        .filter(|line| looks_like_name_line(line))
        .map(title_case)
        .find(|name| name.chars().count() > 3)
        .map(FieldValue::from)
}

/// Date following a date-of-birth label, normalized.
pub fn labelled_dob(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let caps = DOB_LABELLED.captures(ctx.text)?;
    Some(normalize_date(caps.get(1)?.as_str()).into())
}

/// The chronologically earliest parseable date anywhere in the text.
pub fn earliest_dob(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let date = DateExtractor::new().earliest(ctx.text)?;
    Some(date.format(DATE_FORMAT).to_string().into())
}

/// `Male`/`Female` from a bare word or a labelled `M`/`F`.
pub fn gender(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let caps = GENDER.captures(ctx.text)?;
    let token = caps.get(1).or_else(|| caps.get(2))?.as_str().to_lowercase();
    let gender = match token.as_str() {
        "m" | "male" => "Male",
        "f" | "female" => "Female",
        _ => return None,
    };
    Some(gender.into())
}
