//! Date detection, parsing, and normalization.

use std::cmp::Reverse;

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_DAY_MONTH_NAME, DATE_MONTH_NAME_DAY, DATE_NUMERIC, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// Output format for normalized dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateShape {
    /// 1990-04-12
    YearFirst,
    /// 04/12/1990, 12.04.90
    Numeric,
    /// 12 Apr 1990
    DayMonthName,
    /// April 12, 1990
    MonthNameDay,
}

impl DateShape {
    fn regex(self) -> &'static Regex {
        match self {
            DateShape::YearFirst => &DATE_YMD,
            DateShape::Numeric => &DATE_NUMERIC,
            DateShape::DayMonthName => &DATE_DAY_MONTH_NAME,
            DateShape::MonthNameDay => &DATE_MONTH_NAME_DAY,
        }
    }

    fn parse(self, s: &str) -> Option<NaiveDate> {
        let caps = self.regex().captures(s)?;
        match self {
            DateShape::YearFirst => {
                NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
            }
            DateShape::Numeric => {
                let first: u32 = caps[1].parse().ok()?;
                let second: u32 = caps[2].parse().ok()?;
                let year = parse_year(&caps[3])?;

                // Month first unless the first number can only be a day.
                let (month, day) = if first > 12 { (second, first) } else { (first, second) };
                NaiveDate::from_ymd_opt(year, month, day)
                    .or_else(|| NaiveDate::from_ymd_opt(year, day, month))
            }
            DateShape::DayMonthName => NaiveDate::from_ymd_opt(
                caps[3].parse().ok()?,
                month_to_number(&caps[2])?,
                caps[1].parse().ok()?,
            ),
            DateShape::MonthNameDay => NaiveDate::from_ymd_opt(
                caps[3].parse().ok()?,
                month_to_number(&caps[1])?,
                caps[2].parse().ok()?,
            ),
        }
    }
}

const SHAPES: [DateShape; 4] = [
    DateShape::YearFirst,
    DateShape::Numeric,
    DateShape::DayMonthName,
    DateShape::MonthNameDay,
];

/// A date-shaped span of text.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    shape: DateShape,
}

/// Non-overlapping date-shaped spans in document order.
fn candidates(text: &str) -> Vec<Candidate> {
    let mut found: Vec<Candidate> = SHAPES
        .iter()
        .flat_map(|&shape| {
            shape.regex().find_iter(text).map(move |m| Candidate {
                start: m.start(),
                end: m.end(),
                shape,
            })
        })
        .collect();

    // Longest span first when two shapes start at the same offset.
    found.sort_by_key(|c| (c.start, Reverse(c.end)));

    let mut result: Vec<Candidate> = Vec::with_capacity(found.len());
    for candidate in found {
        if result.last().is_some_and(|prev| candidate.start < prev.end) {
            continue;
        }
        result.push(candidate);
    }
    result
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every date-shaped substring in document order, parseable or not.
    pub fn find_all_strings(&self, text: &str) -> Vec<String> {
        candidates(text)
            .into_iter()
            .map(|c| text[c.start..c.end].to_string())
            .collect()
    }

    /// Chronologically earliest parseable date in the text.
    pub fn earliest(&self, text: &str) -> Option<NaiveDate> {
        self.extract_all(text).into_iter().map(|m| m.value).min()
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        candidates(text)
            .into_iter()
            .filter_map(|c| {
                let source = &text[c.start..c.end];
                c.shape
                    .parse(source)
                    .map(|date| ExtractionMatch::new(date, source).with_position(c.start, c.end))
            })
            .collect()
    }
}

/// Whether `text` contains anything date-shaped.
pub fn contains_date(text: &str) -> bool {
    SHAPES.iter().any(|shape| shape.regex().is_match(text))
}

/// Parse the first date found anywhere in `s`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    candidates(s)
        .into_iter()
        .find_map(|c| c.shape.parse(&s[c.start..c.end]))
        .or_else(|| parse_compact(s.trim()))
}

/// `19900412` as a whole value. Never searched for inside longer text,
/// where eight digits are far more often an identifier.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

/// Normalize a date-like string to `YYYY-MM-DD`.
///
/// Returns the input unchanged if no date can be parsed from it.
pub fn normalize_date(s: &str) -> String {
    match parse_date(s) {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => s.to_string(),
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let prefix: String = month.chars().take(3).collect::<String>().to_lowercase();
    let number = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_month_first() {
        assert_eq!(normalize_date("04/12/1990"), "1990-04-12");
    }

    #[test]
    fn test_normalize_day_first_when_unambiguous() {
        assert_eq!(normalize_date("25/12/2020"), "2020-12-25");
        assert_eq!(normalize_date("15.01.24"), "2024-01-15");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["1990-04-12", "2024-01-15", "1969-12-31"] {
            assert_eq!(normalize_date(input), input);
            assert_eq!(normalize_date(&normalize_date(input)), input);
        }
    }

    #[test]
    fn test_normalize_month_names() {
        assert_eq!(normalize_date("12 Jan 1990"), "1990-01-12");
        assert_eq!(normalize_date("3rd March 2001"), "2001-03-03");
        assert_eq!(normalize_date("September 7, 1985"), "1985-09-07");
        assert_eq!(normalize_date("07-Sep-1985"), "1985-09-07");
    }

    #[test]
    fn test_normalize_is_fuzzy() {
        assert_eq!(normalize_date("born on 04/12/1990 in Pune"), "1990-04-12");
    }

    #[test]
    fn test_compact_whole_value() {
        assert_eq!(normalize_date("19900412"), "1990-04-12");
        assert_eq!(normalize_date(" 20240229 "), "2024-02-29");
        assert_eq!(normalize_date("19901340"), "19901340");
        assert_eq!(parse_date("Roll 19900412"), None);
        assert!(DateExtractor::new().find_all_strings("ID 20210412").is_empty());
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date("13/13/2020"), "13/13/2020");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("01/02/75"), Some(ymd(1975, 1, 2)));
        assert_eq!(parse_date("01/02/05"), Some(ymd(2005, 1, 2)));
    }

    #[test]
    fn test_find_all_strings_in_order() {
        let text = "Issued 2019-06-01\nDOB 04/12/1990, renewed 13/13/2020";
        let found = DateExtractor::new().find_all_strings(text);
        assert_eq!(found, vec!["2019-06-01", "04/12/1990", "13/13/2020"]);
    }

    #[test]
    fn test_earliest() {
        let text = "Valid until 01/01/2030\nIssued 5 May 2015\n03/02/1998";
        assert_eq!(DateExtractor::new().earliest(text), Some(ymd(1998, 3, 2)));
    }

    #[test]
    fn test_extract_positions() {
        let text = "x 2020-01-02 y";
        let found = DateExtractor::new().extract(text).unwrap();
        assert_eq!(found.value, ymd(2020, 1, 2));
        assert_eq!(found.position, Some((2, 12)));
        assert_eq!(found.source, "2020-01-02");
    }
}
