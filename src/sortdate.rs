//! Chronological sort key for records.
//!
//! The key is a synthetic `YYYY-MM-DD` used only for ordering; the day is a placeholder chosen
//! so that records with better date evidence sort consistently within their year.

use crate::ads::bibtex::MonthTable;
use crate::identifier::arxiv::is_preprint_venue;

/// Date evidence available for one record.
#[derive(Debug, Clone, Copy)]
pub struct DateEvidence<'a> {
    pub venue: &'a str,
    pub year: &'a str,
    pub arxiv_id: &'a str,
    pub refereed: bool,
    pub bibcode: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortDate {
    pub date: String,
    /// Three-letter BibTeX month token, empty when unknown.
    pub month_token: String,
    /// Two-digit month, empty when unknown.
    pub month_num: String,
}

impl SortDate {
    fn new(date: String, token: &str, num: &str) -> Self {
        SortDate {
            date,
            month_token: token.to_string(),
            month_num: num.to_string(),
        }
    }
}

/// Derive the sort key. First match wins:
///
/// 1. refereed journal paper with a BibTeX month: `YYYY-MM-15`
/// 2. arXiv e-print with a `YYMM...` id: `20YY-MM-31`
/// 3. refereed with a year: `YYYY-06-30`
/// 4. anything else with a year: `YYYY-01-01`
/// 5. no year: empty
pub fn derive(ev: &DateEvidence<'_>, months: &MonthTable) -> SortDate {
    let year = ev.year.trim();

    if ev.refereed
        && !ev.venue.is_empty()
        && !is_preprint_venue(ev.venue)
        && !year.is_empty()
        && let Some(month) = months.get(ev.bibcode)
    {
        return SortDate::new(format!("{year}-{}-15", month.num), &month.token, month.num);
    }

    if is_preprint_venue(ev.venue)
        && let Some(prefix) = ev.arxiv_id.get(..4)
        && prefix.bytes().all(|b| b.is_ascii_digit())
    {
        let (yy, mm) = prefix.split_at(2);
        return SortDate::new(format!("20{yy}-{mm}-31"), "", mm);
    }

    match (year.is_empty(), ev.refereed) {
        (true, _) => SortDate::default(),
        (false, true) => SortDate::new(format!("{year}-06-30"), "jun", "06"),
        (false, false) => SortDate::new(format!("{year}-01-01"), "jan", "01"),
    }
}
