//! Lookups into the `/metrics` payload, whose section names and key spellings differ between
//! API versions.
//!
//! Each lookup is an ordered table of named strategies. The first strategy that returns
//! something wins, so adding tolerance for a new spelling means adding a table entry.

use serde_json::{Map, Value};

use crate::ads::doc::coerce_int;
use crate::metrics::series::{self, Point};

type KeyStrategy = for<'a> fn(&'a Map<String, Value>, &[&str]) -> Option<&'a Value>;
type ShapeStrategy = fn(&Value) -> Option<Vec<Point>>;

/// Section and histogram lookup.
///
/// NOTE: Ordering is important here: an exact key is trusted over a fuzzy one.
static KEY_LOOKUPS: &[(&str, KeyStrategy)] = &[
    ("exact key", exact_key),
    ("substring", substring_key),
];

/// Scalar lookup, comparing keys with everything but `[a-z0-9]` removed.
static SCALAR_LOOKUPS: &[(&str, KeyStrategy)] = &[
    ("normalised key", normalised_key),
    ("normalised substring", normalised_substring),
];

/// Histogram block layouts.
static HISTOGRAM_SHAPES: &[(&str, ShapeStrategy)] = &[
    ("parallel arrays", parallel_arrays),
    ("category map", category_map),
];

/// Category labels preferred when a histogram has several.
const PREFERRED_LABELS: &[&str] = &["all publications", "all citations", "all reads", "all downloads"];

fn run<'a>(
    table: &[(&'static str, KeyStrategy)],
    value: Option<&'a Value>,
    needles: &[&str],
) -> Option<&'a Value> {
    let map = value?.as_object()?;
    table.iter().find_map(|(name, strategy)| {
        let found = strategy(map, needles)?;
        log::trace!("{needles:?} found by {name}");
        Some(found)
    })
}

/// Section (or histogram block) whose key matches one of `needles`.
pub fn section<'a>(root: Option<&'a Value>, needles: &[&str]) -> Option<&'a Value> {
    run(KEY_LOOKUPS, root, needles)
}

/// Integer under the first key matching one of `keys`; zero when missing or non-numeric.
pub fn scalar(section: Option<&Value>, keys: &[&str]) -> i64 {
    run(SCALAR_LOOKUPS, section, keys).map_or(0, coerce_int)
}

/// Per-year series of the histogram block matching `names`.
pub fn histogram(histograms: Option<&Value>, names: &[&str]) -> Vec<Point> {
    let Some(block) = section(histograms, names) else {
        return Vec::new();
    };
    HISTOGRAM_SHAPES
        .iter()
        .find_map(|(name, shape)| {
            let series = shape(block)?;
            log::trace!("histogram {names:?} read as {name}");
            Some(series)
        })
        .unwrap_or_default()
}

/// Citations per year summed over every non-normalised citation category, ignoring years
/// after `current_year`.
pub fn combined_citations(histograms: Option<&Value>, current_year: i64) -> Vec<Point> {
    let Some(block) = section(histograms, &["citations"]).and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut pairs = std::collections::BTreeMap::<i64, i64>::new();
    for (label, per_year) in block {
        if label.to_lowercase().contains("normalized") {
            continue;
        }
        let Some(per_year) = per_year.as_object() else {
            continue;
        };
        for (year, value) in per_year {
            let year = crate::ads::doc::parse_int(year);
            if year > current_year {
                continue;
            }
            *pairs.entry(year).or_default() += coerce_int(value);
        }
    }
    series::from_pairs(pairs)
}

fn exact_key<'a>(map: &'a Map<String, Value>, needles: &[&str]) -> Option<&'a Value> {
    needles.iter().find_map(|n| map.get(*n))
}

fn substring_key<'a>(map: &'a Map<String, Value>, needles: &[&str]) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| {
            let k = k.to_lowercase();
            needles.iter().any(|n| k.contains(&n.to_lowercase()))
        })
        .map(|(_, v)| v)
}

fn normalised_key<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let wanted: Vec<String> = keys.iter().map(|k| norm_key(k)).collect();
    map.iter()
        .find(|(k, _)| wanted.contains(&norm_key(k)))
        .map(|(_, v)| v)
}

fn normalised_substring<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let wanted: Vec<String> = keys.iter().map(|k| norm_key(k)).collect();
    map.iter()
        .find(|(k, _)| {
            let nk = norm_key(k);
            wanted.iter().any(|w| nk.contains(w.as_str()))
        })
        .map(|(_, v)| v)
}

/// `{"year": [...], "count": [...]}`; when there is no `count`, the first other list is used.
fn parallel_arrays(block: &Value) -> Option<Vec<Point>> {
    fn non_empty(v: Option<&Value>) -> Option<&Vec<Value>> {
        v.and_then(Value::as_array).filter(|a| !a.is_empty())
    }
    let obj = block.as_object()?;
    let years = non_empty(obj.get("year")).or_else(|| non_empty(obj.get("years")))?;
    let values = non_empty(obj.get("count")).or_else(|| {
        obj.iter()
            .filter(|(k, _)| !matches!(k.as_str(), "year" | "years"))
            .find_map(|(_, v)| non_empty(Some(v)))
    })?;
    Some(series::from_pairs(
        years.iter().zip(values).map(|(y, v)| (coerce_int(y), coerce_int(v))),
    ))
}

/// `{"all publications": {"2020": 3, ...}, "refereed publications": {...}}`
fn category_map(block: &Value) -> Option<Vec<Point>> {
    let obj = block.as_object()?;
    let chosen = PREFERRED_LABELS
        .iter()
        .find_map(|l| obj.get(*l).and_then(Value::as_object))
        .or_else(|| obj.values().find_map(Value::as_object))?;
    Some(series::from_pairs(
        chosen.iter().map(|(y, v)| (crate::ads::doc::parse_int(y), coerce_int(v))),
    ))
}

fn norm_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pts(list: &[(i64, i64)]) -> Vec<Point> {
        list.iter().map(|&(year, value)| Point { year, value }).collect()
    }

    #[test]
    fn sections_by_exact_then_substring() {
        let raw = json!({
            "basic stats": {"number of papers": 4},
            "Citation Indicators": {"h": 5, "g": 7},
            "indicators": {"h": 9}
        });
        assert_eq!(section(Some(&raw), &["indicators"]), Some(&json!({"h": 9})));
        assert_eq!(section(Some(&raw), &["basic"]), Some(&json!({"number of papers": 4})));
        assert_eq!(section(Some(&raw), &["time series"]), None);
        assert_eq!(section(None, &["basic"]), None);
    }

    #[test]
    fn indices_independent_of_key_spelling() {
        let raw = json!({"Citation Indicators": {"h": 5, "g": 7}});
        let ind = section(Some(&raw), &["indicators"]);
        assert_eq!(scalar(ind, &["h", "h-index", "h_index", "hindex"]), 5);
        assert_eq!(scalar(ind, &["g", "g-index", "g_index", "gindex"]), 7);

        let raw = json!({"indicators": {"H-Index": "11", "G_index": 14.0}});
        let ind = section(Some(&raw), &["indicators"]);
        assert_eq!(scalar(ind, &["h", "h-index"]), 11);
        assert_eq!(scalar(ind, &["g", "g-index"]), 14);
    }

    #[test]
    fn scalar_strategies_in_order() {
        let sec = json!({"total number of citations": 40, "citations to refereed": 30});
        assert_eq!(normalised_key(sec.as_object().unwrap(), &["citations"]), None);
        assert_eq!(scalar(Some(&sec), &["total number of citations", "citations"]), 40);
        assert_eq!(scalar(Some(&sec), &["refereed"]), 30);
        assert_eq!(scalar(Some(&json!({"papers": "n/a"})), &["papers"]), 0);
        assert_eq!(scalar(None, &["papers"]), 0);
    }

    #[test]
    fn parallel_array_histograms() {
        let h = json!({"reads": {"year": [2019, 2020, 2021], "count": [0, 2, 9]}});
        assert_eq!(histogram(Some(&h), &["reads", "read"]), pts(&[(2019, 0), (2020, 2), (2021, 9)]));

        let h = json!({"pubs": {"years": ["2020", "2021"], "refereed": [1, 2]}});
        assert_eq!(histogram(Some(&h), &["publications", "papers", "pubs"]), pts(&[(2020, 1), (2021, 2)]));
    }

    #[test]
    fn category_map_histograms() {
        let h = json!({"publications": {"all publications": {"2021": 5, "2020": 3}}});
        assert_eq!(histogram(Some(&h), &["publications"]), pts(&[(2020, 3), (2021, 5)]));

        let h = json!({"publications": {"refereed publications": {"2022": 1}, "all publications": {"2020": 3}}});
        assert_eq!(histogram(Some(&h), &["publications"]), pts(&[(2020, 3)]));

        let h = json!({"Papers per year": {"note": "x", "refereed": {"2019": 2}}});
        assert_eq!(histogram(Some(&h), &["papers"]), pts(&[(2019, 2)]));
    }

    #[test]
    fn category_map_strategy_alone() {
        let block = json!({"all publications": {"2020": 3, "2021": 5}});
        assert_eq!(category_map(&block), Some(pts(&[(2020, 3), (2021, 5)])));
        assert_eq!(parallel_arrays(&block), None);
        assert_eq!(category_map(&json!({"year": [2020]})), None);
    }

    #[test]
    fn unusable_histograms_are_empty() {
        assert!(histogram(Some(&json!({"reads": [1, 2]})), &["reads"]).is_empty());
        assert!(histogram(Some(&json!({"reads": {"year": [], "count": []}})), &["reads"]).is_empty());
        assert!(histogram(None, &["reads"]).is_empty());
    }

    #[test]
    fn citations_combined_across_categories() {
        let h = json!({"citations": {
            "refereed to refereed": {"2020": 1, "2021": 2, "2999": 50},
            "nonrefereed to refereed": {"2021": 3},
            "refereed to refereed normalized": {"2021": 0.5},
            "total": "not a map"
        }});
        assert_eq!(combined_citations(Some(&h), 2025), pts(&[(2020, 1), (2021, 5)]));
        assert!(combined_citations(Some(&json!({})), 2025).is_empty());
    }
}
