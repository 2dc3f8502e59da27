//! Batched metadata and BibTeX-month retrieval.

use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::ads::Upstream;
use crate::ads::bibtex::{self, MonthTable};
use crate::ads::doc::RawDoc;

/// Fields requested from `/search/query`.
pub const SEARCH_FIELDS: &[&str] = &[
    "bibcode",
    "title",
    "author",
    "year",
    "pub",
    "volume",
    "page",
    "page_range",
    "doi",
    "identifier",
    "citation_count",
    "pubdate",
    "property",
];

/// Bibcodes per search query; keeps the query string under ADS's length limit.
pub const SEARCH_BATCH: usize = 50;
const SEARCH_ROWS: usize = 200;
/// Bibcodes per BibTeX export request.
pub const EXPORT_BATCH: usize = 100;

/// `bibcode:"A" OR bibcode:"B" ...`
pub fn bibcode_query(batch: &[String]) -> String {
    batch
        .iter()
        .map(|b| format!("bibcode:\"{b}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Fetch metadata for `bibcodes`, `SEARCH_BATCH` at a time, pausing between batches.
pub fn fetch_records(
    api: &impl Upstream,
    bibcodes: &[String],
    pause: Duration,
) -> anyhow::Result<Vec<RawDoc>> {
    let batches = bibcodes.chunks(SEARCH_BATCH);
    let bar = progress_bar(batches.len() as u64, "metadata");

    let mut out = Vec::with_capacity(bibcodes.len());
    for (i, batch) in batches.enumerate() {
        if i > 0 && !pause.is_zero() {
            std::thread::sleep(pause);
        }
        let body = api
            .search(&bibcode_query(batch), SEARCH_FIELDS, SEARCH_ROWS)
            .with_context(|| format!("metadata query for batch {} failed", i + 1))?;
        let docs = response_docs(body);
        log::debug!("batch {}: {} of {} documents returned", i + 1, docs.len(), batch.len());
        out.extend(docs);
        bar.inc(1);
    }
    bar.finish_and_clear();

    if out.len() < bibcodes.len() {
        log::warn!(
            "ADS returned {} documents for {} bibcodes",
            out.len(),
            bibcodes.len()
        );
    }
    Ok(out)
}

/// BibTeX months for `bibcodes`, `EXPORT_BATCH` at a time.
pub fn fetch_months(api: &impl Upstream, bibcodes: &[String]) -> anyhow::Result<MonthTable> {
    let mut out = MonthTable::new();
    for batch in bibcodes.chunks(EXPORT_BATCH) {
        let export = api.export_bibtex(batch).context("BibTeX export failed")?;
        out.extend(bibtex::parse_months(&export));
    }
    log::debug!("recovered months for {} of {} refereed records", out.len(), bibcodes.len());
    Ok(out)
}

fn response_docs(body: Value) -> Vec<RawDoc> {
    match body {
        Value::Object(mut map) => match map.remove("response") {
            Some(Value::Object(mut resp)) => match resp.remove("docs") {
                Some(Value::Array(docs)) => docs.into_iter().filter_map(RawDoc::from_value).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn progress_bar(len: u64, label: &'static str) -> ProgressBar {
    let bar = crate::logging::attach(ProgressBar::new(len));
    if let Ok(style) = ProgressStyle::with_template("{msg:>10} [{bar:30}] {pos}/{len} batches") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        queries: RefCell<Vec<String>>,
        exports: RefCell<Vec<usize>>,
    }

    impl Upstream for Recorder {
        fn list_libraries(&self) -> anyhow::Result<Value> {
            unreachable!()
        }
        fn library(&self, _id: &str) -> anyhow::Result<Value> {
            unreachable!()
        }
        fn search(&self, query: &str, fields: &[&str], rows: usize) -> anyhow::Result<Value> {
            assert_eq!(fields, SEARCH_FIELDS);
            assert_eq!(rows, SEARCH_ROWS);
            self.queries.borrow_mut().push(query.to_string());
            let docs: Vec<Value> = query
                .split(" OR ")
                .map(|q| json!({"bibcode": q.trim_start_matches("bibcode:\"").trim_end_matches('"')}))
                .collect();
            Ok(json!({"responseHeader": {}, "response": {"numFound": docs.len(), "docs": docs}}))
        }
        fn export_bibtex(&self, bibcodes: &[String]) -> anyhow::Result<String> {
            self.exports.borrow_mut().push(bibcodes.len());
            Ok(bibcodes
                .iter()
                .map(|b| format!("@ARTICLE{{{b},\n  year = 2020,\n  month = feb,\n}}\n\n"))
                .collect())
        }
        fn metrics(&self, _b: &[String]) -> anyhow::Result<Value> {
            unreachable!()
        }
    }

    fn codes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("2020Code{i:05}")).collect()
    }

    #[test]
    fn query_is_disjunction() {
        assert_eq!(
            bibcode_query(&["A".into(), "B".into()]),
            "bibcode:\"A\" OR bibcode:\"B\""
        );
    }

    #[test]
    fn batches_of_fifty() {
        let api = Recorder::default();
        let docs = fetch_records(&api, &codes(120), Duration::ZERO).unwrap();
        assert_eq!(docs.len(), 120);
        let sizes: Vec<usize> = api
            .queries
            .borrow()
            .iter()
            .map(|q| q.matches(" OR ").count() + 1)
            .collect();
        assert_eq!(sizes, [50, 50, 20]);
        assert_eq!(docs[119].text("bibcode"), "2020Code00119");
    }

    #[test]
    fn months_in_batches_of_hundred() {
        let api = Recorder::default();
        let table = fetch_months(&api, &codes(230)).unwrap();
        assert_eq!(*api.exports.borrow(), [100, 100, 30]);
        assert_eq!(table.len(), 230);
        assert_eq!(table["2020Code00007"].num, "02");
    }

    #[test]
    fn malformed_search_bodies_yield_nothing() {
        assert!(response_docs(json!({"response": {"docs": "nope"}})).is_empty());
        assert!(response_docs(json!([1, 2])).is_empty());
        assert_eq!(response_docs(json!({"response": {"docs": [{"bibcode": "A"}, 3]}})).len(), 1);
    }

    #[test]
    fn no_bibcodes_no_calls() {
        let api = Recorder::default();
        assert!(fetch_records(&api, &[], Duration::ZERO).unwrap().is_empty());
        assert!(fetch_months(&api, &[]).unwrap().is_empty());
        assert!(api.queries.borrow().is_empty());
        assert!(api.exports.borrow().is_empty());
    }
}
