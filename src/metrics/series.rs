use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::ads::doc::{coerce_int, parse_int};

/// One year of a per-year series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub year: i64,
    pub value: i64,
}

/// Citation indices for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexPoint {
    pub year: i64,
    pub h_index: i64,
    pub g_index: i64,
    pub i10_index: i64,
    pub read10_index: i64,
}

/// Build a series sorted by year. A year seen twice keeps its last value.
pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, i64)>) -> Vec<Point> {
    pairs
        .into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(year, value)| Point { year, value })
        .collect()
}

/// Value for `year`, zero when absent.
pub fn value_at(series: &[Point], year: i64) -> i64 {
    series
        .iter()
        .find(|p| p.year == year)
        .map_or(0, |p| p.value)
}

/// Drop leading zero years. A series that is zero throughout is returned unchanged.
pub fn trim_leading_zeros(series: Vec<Point>) -> Vec<Point> {
    match series.iter().position(|p| p.value != 0) {
        Some(first) => series[first..].to_vec(),
        None => series,
    }
}

/// Papers per year counted from records' `year` fields; non-numeric years are skipped.
pub fn count_by_year<'a>(years: impl IntoIterator<Item = &'a str>) -> Vec<Point> {
    let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
    for y in years {
        if !y.is_empty() && y.bytes().all(|b| b.is_ascii_digit()) {
            *counts.entry(parse_int(y)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(year, value)| Point { year, value })
        .collect()
}

/// Merge the `h`, `g`, `i10` and `read10` year maps of a `time series` section.
pub fn index_series(time_series: Option<&Value>) -> Vec<IndexPoint> {
    let Some(ts) = time_series.and_then(Value::as_object) else {
        return Vec::new();
    };
    let by_year = |key: &str| -> BTreeMap<i64, i64> {
        ts.get(key)
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(y, v)| (parse_int(y), coerce_int(v))).collect())
            .unwrap_or_default()
    };
    let (h, g, i10, read10) = (by_year("h"), by_year("g"), by_year("i10"), by_year("read10"));

    let years: BTreeSet<i64> = [&h, &g, &i10, &read10]
        .iter()
        .flat_map(|m| m.keys().copied())
        .collect();
    let at = |m: &BTreeMap<i64, i64>, y: i64| m.get(&y).copied().unwrap_or(0);
    years
        .into_iter()
        .map(|year| IndexPoint {
            year,
            h_index: at(&h, year),
            g_index: at(&g, year),
            i10_index: at(&i10, year),
            read10_index: at(&read10, year),
        })
        .collect()
}

/// Index value for `year` as picked by `field`, zero when absent.
pub fn index_at(series: &[IndexPoint], year: i64, field: fn(&IndexPoint) -> i64) -> i64 {
    series.iter().find(|p| p.year == year).map_or(0, field)
}
