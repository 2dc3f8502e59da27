//! Topical tags derived from title and venue keywords.

use crate::record::Record;
use crate::text::norm;

/// Tag carried by SDSS / Sloan papers; the default subset output selects on it.
pub const SDSS_TAG: &str = "sdssv";

/// Normalised text a rule can look at.
struct TagText {
    title: String,
    venue: String,
    /// Title with TeX math delimiters and escapes removed ("$B$-type" -> "b-type").
    title_plain: String,
}

struct TagRule {
    tag: &'static str,
    matches: fn(&TagText) -> bool,
}

/// Tag rules, applied in order; every matching rule contributes its tag.
static RULES: &[TagRule] = &[
    TagRule {
        tag: SDSS_TAG,
        matches: |t| ["sdss", "sloan"].iter().any(|k| t.title.contains(k) || t.venue.contains(k)),
    },
    TagRule {
        tag: "algols",
        matches: |t| t.title.contains("algol"),
    },
    TagRule {
        tag: "bbc",
        matches: |t| {
            ["b-type binaries", "b-type binary", "binary b stars", "b-star binaries"]
                .iter()
                .any(|k| t.title.contains(k))
                || t.title_plain.contains("b-type binaries")
        },
    },
    TagRule {
        tag: "bloem",
        matches: |t| t.title.contains("bloem"),
    },
];

pub fn tags_for(title: &str, venue: &str) -> Vec<String> {
    let plain: String = title
        .chars()
        .filter(|c| !matches!(c, '$' | '\\' | '{' | '}'))
        .collect();
    let text = TagText {
        title: norm(title),
        venue: norm(venue),
        title_plain: norm(&plain),
    };
    RULES
        .iter()
        .filter(|r| (r.matches)(&text))
        .map(|r| r.tag.to_string())
        .collect()
}

/// Records carrying `tag`, in their original order.
pub fn filter_by_tag(records: &[Record], tag: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.tags.iter().any(|t| t == tag))
        .cloned()
        .collect()
}
