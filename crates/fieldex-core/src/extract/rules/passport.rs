//! Passport data page rules.

use regex::Regex;

use super::dates::normalize_date;
use super::patterns::{EXPIRY_LABELLED, ISSUE_LABELLED, NATIONALITY, PASSPORT_NUMBER};
use super::person;
use super::{apply_rules, ExtractionPass, FieldMap, PassContext, Rule};
use crate::models::fields::FieldValue;

/// Passport rule table, in evaluation order. Every rule only fills.
pub const PASSPORT_RULES: &[Rule] = &[
    Rule::fill("passport_number", "passport_number", passport_number),
    Rule::fill("name", "name", person::labelled_name),
    Rule::fill("name", "name", person::uppercase_name),
    Rule::fill("nationality", "nationality", nationality),
    Rule::fill("date_of_birth", "date_of_birth", person::labelled_dob),
    Rule::fill("date_of_birth", "date_of_birth", person::earliest_dob),
    Rule::fill("expiry_date", "expiry_date", expiry_date),
    Rule::fill("issue_date", "issue_date", issue_date),
    Rule::fill("gender", "gender", person::gender),
];

pub struct PassportPass;

impl ExtractionPass for PassportPass {
    fn name(&self) -> &'static str {
        "passport"
    }

    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap) {
        apply_rules(PASSPORT_RULES, ctx, fields);
    }
}

fn passport_number(ctx: &PassContext<'_>) -> Option<FieldValue> {
    PASSPORT_NUMBER.find(ctx.text).map(|m| m.as_str().into())
}

fn nationality(ctx: &PassContext<'_>) -> Option<FieldValue> {
    let caps = NATIONALITY.captures(ctx.text)?;
    Some(caps.get(1)?.as_str().into())
}

fn labelled_date(regex: &Regex, text: &str) -> Option<FieldValue> {
    let caps = regex.captures(text)?;
    Some(normalize_date(caps.get(1)?.as_str()).into())
}

fn expiry_date(ctx: &PassContext<'_>) -> Option<FieldValue> {
    labelled_date(&EXPIRY_LABELLED, ctx.text)
}

fn issue_date(ctx: &PassContext<'_>) -> Option<FieldValue> {
    labelled_date(&ISSUE_LABELLED, ctx.text)
}
