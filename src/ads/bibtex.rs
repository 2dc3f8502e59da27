//! Publication months recovered from the ADS BibTeX export.
//!
//! The search endpoint only gives a year for refereed papers; the BibTeX export carries a
//! `month = jun` field. The export is one concatenated text blob, scanned block by block.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// A BibTeX month: its three-letter token and two-digit number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    pub token: String,
    pub num: &'static str,
}

/// Months keyed by bibcode.
pub type MonthTable = HashMap<String, Month>;

static BIB_MONTHS: &[(&str, &str)] = &[
    ("jan", "01"),
    ("feb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

pub fn month_number(token: &str) -> Option<&'static str> {
    let token = token.to_ascii_lowercase();
    BIB_MONTHS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, n)| *n)
}

/// Scan a BibTeX export and collect the month of every entry that has one.
pub fn parse_months(export: &str) -> MonthTable {
    static ENTRY_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)@[\w\-]+\{([^,]+),(.*?)\n\}\s*").unwrap());
    static MONTH_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"(?mi)^\s*month\s*=\s*[{"]?([A-Za-z]{3})"#).unwrap());

    let mut out = MonthTable::new();
    for entry in ENTRY_RE.captures_iter(export) {
        let code = entry[1].trim();
        let Some(m) = MONTH_RE.captures(&entry[2]) else {
            continue;
        };
        let token = m[1].to_ascii_lowercase();
        if let Some(num) = month_number(&token) {
            out.insert(code.to_string(), Month { token, num });
        }
    }
    out
}
