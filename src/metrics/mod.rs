//! Citation metrics summary: totals, year-over-year deltas and per-year plot series.

use std::time::Duration;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::{Value, json};

use crate::ads::Upstream;
use crate::record::Record;

pub mod extract;
pub mod series;

use series::{IndexPoint, Point};

const PAPER_HISTOGRAMS: &[&str] = &["publications", "papers", "pubs"];
const READ_HISTOGRAMS: &[&str] = &["reads", "read"];
const TOTAL_PAPER_KEYS: &[&str] = &["number of papers", "papers", "publications", "pubs"];
const TOTAL_CITATION_KEYS: &[&str] = &[
    "total number of citations",
    "citations",
    "total citations",
    "citations total",
];
const H_KEYS: &[&str] = &["h", "h-index", "h_index", "hindex"];
const G_KEYS: &[&str] = &["g", "g-index", "g_index", "gindex"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Snapshot date, `YYYY-MM-DD`.
    pub as_of: String,
    /// Year the deltas refer to.
    pub delta_year: i64,
    pub metrics: Totals,
    pub plots: Plots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_papers: i64,
    pub total_citations: i64,
    pub h_index: i64,
    pub g_index: i64,
    pub deltas: Deltas,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deltas {
    pub total_papers: i64,
    pub total_citations: i64,
    pub h_index: i64,
    pub g_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plots {
    pub papers_per_year: Vec<Point>,
    pub citations_per_year: Vec<Point>,
    pub reads_per_year: Vec<Point>,
    pub indices_per_year: Vec<IndexPoint>,
}

/// Calendar context for a summary.
#[derive(Debug, Clone, Copy)]
pub struct Years {
    /// Year the deltas are computed for.
    pub reference: i64,
    /// Today's year; citation counts for later years are ignored.
    pub current: i64,
}

/// Pick the delta year: an explicit choice, else the one already in the metrics file, else
/// the current year.
pub fn reference_year(explicit: Option<i64>, existing: Option<i64>, current: i64) -> i64 {
    explicit
        .filter(|y| *y != 0)
        .or(existing.filter(|y| *y != 0))
        .unwrap_or(current)
}

/// Reshape a raw `/metrics` payload. Anything missing from the payload falls back to what can
/// be derived from `records`, or zero.
pub fn summarize(raw: &Value, records: &[Record], years: Years, as_of: String) -> MetricsSummary {
    let root = Some(raw);
    let basic = extract::section(root, &["basic"]);
    let citation = extract::section(root, &["citation"]);
    let indicators = extract::section(root, &["indicators"]);
    let time_series = extract::section(root, &["time series"]);
    let histograms = extract::section(root, &["histograms", "histogram"]);

    let mut papers_per_year = extract::histogram(histograms, PAPER_HISTOGRAMS);
    if papers_per_year.is_empty() {
        papers_per_year = series::count_by_year(records.iter().map(|r| r.year.as_str()));
    }
    let citations_per_year = extract::combined_citations(histograms, years.current);
    let reads_per_year = series::trim_leading_zeros(extract::histogram(histograms, READ_HISTOGRAMS));
    let indices_per_year = series::index_series(time_series);

    let total_papers = match extract::scalar(basic, TOTAL_PAPER_KEYS) {
        0 => records.len() as i64,
        n => n,
    };
    let total_citations = match extract::scalar(citation, TOTAL_CITATION_KEYS) {
        0 => records.iter().map(|r| r.citations as i64).sum(),
        n => n,
    };
    let h_index = match extract::scalar(indicators, H_KEYS) {
        0 => extract::scalar(basic, &H_KEYS[1..]),
        n => n,
    };
    let g_index = match extract::scalar(indicators, G_KEYS) {
        0 => extract::scalar(basic, &G_KEYS[1..]),
        n => n,
    };

    let year = years.reference;
    let index_delta = |field: fn(&IndexPoint) -> i64| {
        series::index_at(&indices_per_year, year, field)
            - series::index_at(&indices_per_year, year - 1, field)
    };
    let deltas = Deltas {
        total_papers: series::value_at(&papers_per_year, year),
        total_citations: series::value_at(&citations_per_year, year),
        h_index: index_delta(|p| p.h_index),
        g_index: index_delta(|p| p.g_index),
    };

    MetricsSummary {
        as_of,
        delta_year: year,
        metrics: Totals {
            total_papers,
            total_citations,
            h_index,
            g_index,
            deltas,
        },
        plots: Plots {
            papers_per_year,
            citations_per_year,
            reads_per_year,
            indices_per_year,
        },
    }
}

/// Attempts and base delay for the metrics call; attempt `n` is followed by a `n × base_delay`
/// pause.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

/// Fetch raw metrics, retrying failed requests with a linearly growing delay.
pub fn fetch_with_retry(
    api: &impl Upstream,
    bibcodes: &[String],
    policy: RetryPolicy,
) -> anyhow::Result<Value> {
    if bibcodes.is_empty() {
        return Ok(json!({}));
    }
    let mut last_err = None;
    for attempt in 1..=policy.attempts {
        match api.metrics(bibcodes) {
            Ok(raw) => return Ok(raw),
            Err(e) => {
                log::warn!(
                    "metrics request failed (attempt {attempt}/{}): {e:#}",
                    policy.attempts
                );
                last_err = Some(e);
                if attempt < policy.attempts {
                    std::thread::sleep(policy.base_delay * attempt);
                }
            }
        }
    }
    let err = last_err.unwrap_or_else(|| anyhow!("no attempts were made"));
    Err(err.context(format!(
        "ADS metrics request failed after {} attempts",
        policy.attempts
    )))
}
