//! `Label: value` form pass.

use super::dates::normalize_date;
use super::{ExtractionPass, FieldMap, PassContext};

/// Splits every line containing a colon into label and value.
///
/// Labels map to the first dictionary field owning a keyword contained in
/// the label; unknown labels become snake_case field names.
pub struct FormPass;

/// Lower-case, collapse whitespace, drop trailing dots.
pub fn normalize_label(label: &str) -> String {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    label.trim_end_matches('.').trim_end().to_string()
}

impl ExtractionPass for FormPass {
    fn name(&self) -> &'static str {
        "form"
    }

    fn apply(&self, ctx: &PassContext<'_>, fields: &mut FieldMap) {
        for line in &ctx.lines {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };

            let label = normalize_label(label);
            let value = value.trim();
            if label.is_empty() || value.is_empty() {
                continue;
            }

            let field = match ctx.dictionary.field_for_label(&label) {
                Some(field) => field.to_string(),
                None => label.replace(' ', "_"),
            };

            if field.contains("date") {
                fields.fill(&field, normalize_date(value));
            } else {
                fields.fill(&field, value);
            }
        }
    }
}
