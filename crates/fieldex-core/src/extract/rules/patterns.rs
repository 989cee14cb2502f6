//! Common regex patterns for document field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Month name alternation (abbreviations; the full name may follow).
const MONTHS: &str = r"(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?";

/// A date value in any supported shape, used inside labelled patterns.
const DATE_VALUE: &str = r"(?:\d{1,2}[-/.]\d{1,2}[-/.](?:\d{4}|\d{2})|\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{1,2}[- .]*[a-z]{3,9}\.?[- .,]*\d{4}|[a-z]{3,9}\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4})";

lazy_static! {
    // Date shapes
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        &format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?[- .]*{MONTHS}[- .,]*(\d{{4}})\b")
    ).unwrap();

    pub static ref DATE_MONTH_NAME_DAY: Regex = Regex::new(
        &format!(r"(?i)\b{MONTHS}\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b")
    ).unwrap();

    // Labelled dates
    pub static ref DOB_LABELLED: Regex = Regex::new(
        &format!(r"(?i)\b(?:date\s+of\s+birth|birth\s+date|d\.?o\.?b\.?|born(?:\s+on)?)[\s:.\-]*({DATE_VALUE})")
    ).unwrap();

    pub static ref EXPIRY_LABELLED: Regex = Regex::new(
        &format!(r"(?i)\b(?:date\s+of\s+expiry|expiry(?:\s+date)?|expiration(?:\s+date)?|valid\s+(?:until|upto|till)|expires(?:\s+on)?)[\s:.\-]*({DATE_VALUE})")
    ).unwrap();

    pub static ref ISSUE_LABELLED: Regex = Regex::new(
        &format!(r"(?i)\b(?:date\s+of\s+issue|issue\s+date|issued\s+on)[\s:.\-]*({DATE_VALUE})")
    ).unwrap();

    // Person
    pub static ref NAME_LABELLED: Regex = Regex::new(
        r"(?i)\b(?:student\s+name|full\s+name|name)\s*[:\-]\s*(\p{L}[\p{L} .']*\p{L})"
    ).unwrap();

    pub static ref GENDER: Regex = Regex::new(
        r"(?i)\b(?:(?:gender|sex)\s*[:.\-]?\s*(m|f)|(male|female))\b"
    ).unwrap();

    // Student identifiers
    pub static ref ROLL_NUMBER: Regex = Regex::new(
        r"(?i)\broll\s*(?:number|num|no)?\.?\s*[:.\-]?\s*([a-z0-9][a-z0-9/\-]*)"
    ).unwrap();

    pub static ref ENROLLMENT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:enrol+ment|registration|reg)\s*(?:number|num|no)?\.?\s*[:.\-]?\s*([a-z0-9][a-z0-9/\-]*)"
    ).unwrap();

    pub static ref ID_LABELLED: Regex = Regex::new(
        r"(?i)\b(?:student\s+)?id\s*(?:number|num|no)?\.?\s*[:.\-]?\s*([a-z0-9][a-z0-9/\-]{3,})"
    ).unwrap();

    pub static ref NUMBER_LABELLED: Regex = Regex::new(
        r"\b(?:Number|No|NO)[\s:.]+([A-Z0-9]{6,15})\b"
    ).unwrap();

    pub static ref CLASS_LABELLED: Regex = Regex::new(
        r"(?i)\b(?:class|course|programme|program|branch)\s*[:.\-]\s*(.+)"
    ).unwrap();

    /// Start of the next label on the same line (used to cut a value short).
    pub static ref NEXT_LABEL: Regex = Regex::new(
        r"(?i)\s+(?:roll|reg(?:istration)?|enrol+ment|d\.?o\.?b|date\s+of|admission|session|batch|gender|sex|id|phone|mobile|valid|address|name)\b"
    ).unwrap();

    pub static ref ADMISSION_YEAR: Regex = Regex::new(
        r"(?i)\b(?:admission\s+year|year\s+of\s+admission|admitted(?:\s+in)?|admission|batch|session)\s*[:.\-]?\s*((?:19|20)\d{2})\b"
    ).unwrap();

    // Passport
    pub static ref PASSPORT_NUMBER: Regex = Regex::new(
        r"\b[A-Z]{1,2}\d{6,8}\b"
    ).unwrap();

    pub static ref NATIONALITY: Regex = Regex::new(
        r"(?i)\b(?:nationality|citizenship|citizen\s+of)[\s:.\-]+(\p{L}{3,})"
    ).unwrap();

    // Contact
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).unwrap();

    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?\d{1,3}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}"
    ).unwrap();
}
