//! Student / identity card rules.

use regex::Regex;

use super::dates::contains_date;
use super::patterns::{
    ADMISSION_YEAR, CLASS_LABELLED, EMAIL, ENROLLMENT_NUMBER, ID_LABELLED, NUMBER_LABELLED,
    PHONE, ROLL_NUMBER,
};
use super::person::{self, truncate_at_next_label};
use super::{apply_rules, ExtractionPass, FieldMap, PassContext, Rule};
use crate::models::fields::FieldValue;

/// ID card rule table, in evaluation order.
///
/// `roll_no` and `id_number` share one identifier group: the first labelled
/// number found, in this order, is the only one reported. `class` and
/// `gender` replace whatever the keyword pass found.
pub const ID_CARD_RULES: &[Rule] = &[
    Rule::fill("name", "name", person::labelled_name),
    Rule::fill("name", "name", person::uppercase_name),
    Rule::fill("identifier", "roll_no", roll_number),
    Rule::fill("identifier", "roll_no", enrollment_number),
    Rule::fill("identifier", "id_number", labelled_id),
    Rule::fill("identifier", "id_number", numbered_id),
    Rule::overriding("class", "class", class),
    Rule::fill("date_of_birth", "date_of_birth", person::labelled_dob),
    Rule::fill("date_of_birth", "date_of_birth", person::earliest_dob),
    Rule::fill("admission_year", "admission_year", admission_year),
    Rule::fill("address", "address", address),
    Rule::overriding("gender", "gender", person::gender),
];

/// Tokens that make a line look like part of a postal address.
const ADDRESS_WORDS: &[&str] = &[
    "street", "st", "road", "rd", "ave", "avenue", "lane", "ln", "city", "nagar", "colony",
    "sector", "block", "district", "dist", "village", "pin", "pincode", "zip", "flat", "house",
    "apartment", "apt", "floor", "near", "opp",
];

pub struct IdCardPass;

impl ExtractionPass for IdCardPass {
    fn name(&self) -> &'static str {
        "id_card"
    }

    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap) {
        apply_rules(ID_CARD_RULES, ctx, fields);
    }
}

/// First capture of `regex` in `text` that contains a digit.
fn first_number(regex: &Regex, text: &str) -> Option<FieldValue> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['/', '-']))
        .find(|value| value.chars().any(|c| c.is_ascii_digit()))
        .map(FieldValue::from)
}

fn roll_number(ctx: &PassContext<'_>) -> Option<FieldValue> {
    first_number(&ROLL_NUMBER, ctx.text)
}

fn enrollment_number(ctx: &PassContext<'_>) -> Option<FieldValue> {
    first_number(&ENROLLMENT_NUMBER, ctx.text)
}

fn labelled_id(ctx: &PassContext<'_>) -> Option<FieldValue> {
    first_number(&ID_LABELLED, ctx.text)
}

fn numbered_id(ctx: &PassContext<'_>) -> Option<FieldValue> {
    first_number(&NUMBER_LABELLED, ctx.text)
}

fn class(ctx: &PassContext<'_>) -> Option<FieldValue> {
    ctx.lines.iter().find_map(|line| {
        let caps = CLASS_LABELLED.captures(line)?;
        let value = truncate_at_next_label(caps.get(1)?.as_str()).trim();
        (!value.is_empty()).then(|| FieldValue::from(value))
    })
}

fn admission_year(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let caps = ADMISSION_YEAR.captures(ctx.text)?;
    Some(caps.get(1)?.as_str().into())
}

fn is_address_line(ctx: &PassContext<'_>, line: &str) -> bool {
    let lower = line.to_lowercase();
    let has_address_word = lower.contains("address")
        || lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| ADDRESS_WORDS.contains(&token))
        || ctx.labels.matchers("address").iter().any(|m| m.is_match(line));
    let numbered = line.chars().any(|c| c.is_ascii_digit()) && line.split_whitespace().count() > 2;

    if !has_address_word && !numbered {
        return false;
    }

    !ctx.labels.matches_other_field(line, "address")
        && !contains_date(line)
        && !EMAIL.is_match(line)
        && !PHONE.is_match(line)
}

/// Value of an address line with any leading address label removed.
fn strip_address_label<'t>(ctx: &PassContext<'_>, line: &'t str) -> &'t str {
    ctx.labels
        .matchers("address")
        .iter()
        .find_map(|m| m.capture(line))
        .unwrap_or(line)
}

fn address(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let parts: Vec<&str> = ctx
        .non_empty_lines()
        .filter(|line| is_address_line(ctx, line))
        .map(|line| strip_address_label(ctx, line))
        .filter(|part| !part.is_empty())
        .take(ctx.config.max_address_lines)
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", ").into())
}
