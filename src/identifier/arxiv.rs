use once_cell::sync::Lazy;
use regex::Regex;

/// Venue string ADS uses for arXiv-only records.
pub const ARXIV_VENUE: &str = "arXiv e-prints";

pub fn is_preprint_venue(venue: &str) -> bool {
    venue == ARXIV_VENUE
}

/// Find the arXiv id of a record, without version suffix (e.g. "2507.06989").
///
/// Sources are tried from most to least explicit:
///
/// 1. an `arXiv:2507.06989v2` token in the identifier list,
/// 2. an `arxiv.org/abs/...` or `arxiv.org/pdf/...` URL in the identifier list,
/// 3. a DataCite DOI `10.48550/arXiv.2507.06989`,
/// 4. the id encoded in an arXiv bibcode (`2025arXiv250706989K`).
///
/// Returns an empty string when nothing matches.
pub fn extract(identifiers: &[String], doi: &str, bibcode: &str, venue: &str) -> String {
    from_tag(identifiers)
        .or_else(|| from_url(identifiers))
        .or_else(|| from_doi(doi))
        .or_else(|| from_bibcode(bibcode, venue))
        .unwrap_or_default()
}

fn from_tag(identifiers: &[String]) -> Option<String> {
    static TAG_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^arXiv:(?P<id>\d{4}\.\d{4,5})(?:v\d+)?").unwrap());
    identifiers
        .iter()
        .find_map(|x| TAG_RE.captures(x.trim()))
        .map(|c| c["id"].to_string())
}

fn from_url(identifiers: &[String]) -> Option<String> {
    static URL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)arxiv\.org/(?:abs|pdf)/(?P<id>[\w.\-/]+)").unwrap());
    identifiers.iter().find_map(|x| {
        let caps = URL_RE.captures(x)?;
        let id = caps["id"].trim_end_matches('/');
        let id = id.strip_suffix(".pdf").unwrap_or(id);
        let id = strip_version(id);
        (!id.is_empty()).then(|| id.to_string())
    })
}

fn from_doi(doi: &str) -> Option<String> {
    let lower = doi.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("10.48550/arxiv.")
        .or_else(|| lower.strip_prefix("10.48550/arxiv:"))?;
    // Lowercasing ASCII keeps byte offsets, so slice the original to keep its case.
    let start = doi.trim().len() - rest.len();
    let id = strip_version(&doi.trim()[start..]);
    (!id.is_empty()).then(|| id.to_string())
}

fn from_bibcode(bibcode: &str, venue: &str) -> Option<String> {
    if !(bibcode.contains("arXiv") || is_preprint_venue(venue)) {
        return None;
    }
    static DOTTED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)arXiv(?P<id>\d{4}\.\d{4,5})").unwrap());
    static COMPACT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)arXiv(?P<yymm>\d{4})(?P<num>\d{5})").unwrap());

    if let Some(c) = DOTTED_RE.captures(bibcode) {
        return Some(c["id"].to_string());
    }
    COMPACT_RE
        .captures(bibcode)
        .map(|c| format!("{}.{}", &c["yymm"], &c["num"]))
}

/// Drop a trailing `vN` version marker.
fn strip_version(id: &str) -> &str {
    match id.rfind(['v', 'V']) {
        Some(pos)
            if pos > 0
                && pos + 1 < id.len()
                && id[pos + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}
