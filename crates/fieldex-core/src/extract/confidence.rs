//! Per-field confidence scoring.
//!
//! Scores are a deterministic function of the field name and its value and
//! are recomputed for every result; they are never stored on their own.

use super::rules::parse_date;
use crate::models::fields::FieldValue;

const BASE: f32 = 0.7;
const EMAIL_BONUS: f32 = 0.2;
const PHONE_BONUS: f32 = 0.15;
const DATE_BONUS: f32 = 0.2;
const LENGTH_BONUS: f32 = 0.1;
const LIST_BONUS: f32 = 0.1;

/// Confidence in `[0.0, 1.0]` for an extracted value.
pub fn field_confidence(field: &str, value: &FieldValue) -> f32 {
    match value {
        FieldValue::Text(text) => text_confidence(field, text),
        FieldValue::List(items) => list_confidence(items),
    }
}

/// Confidence for a single string value. Empty values score exactly 0.0.
pub fn text_confidence(field: &str, value: &str) -> f32 {
    if value.trim().is_empty() {
        return 0.0;
    }

    let chars = value.chars().count();
    let mut score = BASE;

    if field == "email" && value.contains('@') {
        score += EMAIL_BONUS;
    }
    if field == "phone" && chars >= 10 {
        score += PHONE_BONUS;
    }
    if field.contains("date") && parse_date(value).is_some() {
        score += DATE_BONUS;
    }
    if chars > 2 {
        score += LENGTH_BONUS;
    }

    score.min(1.0)
}

fn list_confidence(items: &[String]) -> f32 {
    if items.is_empty() {
        return 0.0;
    }
    let mut score = BASE;
    if items.len() > 2 {
        score += LIST_BONUS;
    }
    score.min(1.0)
}
