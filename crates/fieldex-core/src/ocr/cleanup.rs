//! Fixes for common OCR recognition slips.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `|` read in place of a capital `I` ("| am", "|'m").
    static ref PIPE_BEFORE_SPACE: Regex = Regex::new(r"\|(\s)").unwrap();
    static ref PIPE_APOSTROPHE: Regex = Regex::new(r"\|'").unwrap();
    static ref PIPE_LINE_START: Regex = Regex::new(r"(?m)^(\s*)\|([A-Za-z])").unwrap();

    static ref REPEATED_SPACES: Regex = Regex::new(r" {2,}").unwrap();
    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"[ \t]+([.,!?;:])").unwrap();
    static ref MISSING_SPACE_AFTER: Regex = Regex::new(r"([,!?;:])([A-Za-z])").unwrap();
}

/// Normalize OCR output before field extraction.
///
/// Line breaks are preserved. A space is never inserted after `.` so
/// abbreviations such as `B.Tech` and `D.O.B` survive.
pub fn clean_ocr_text(text: &str) -> String {
    let text = PIPE_BEFORE_SPACE.replace_all(text, "I$1");
    let text = PIPE_APOSTROPHE.replace_all(&text, "I'");
    let text = PIPE_LINE_START.replace_all(&text, "${1}I${2}");
    let text = REPEATED_SPACES.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = MISSING_SPACE_AFTER.replace_all(&text, "$1 $2");
    text.trim().to_string()
}
