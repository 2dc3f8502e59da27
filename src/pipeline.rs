//! The sync run: library → records → optional subset → optional metrics summary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate};

use crate::ads::Upstream;
use crate::ads::{library, search};
use crate::identifier::arxiv::is_preprint_venue;
use crate::metrics::{self, RetryPolicy, Totals, Years};
use crate::output;
use crate::record::{self, Mapper, Record};
use crate::tags;

/// Pause between search batches.
pub const BATCH_PAUSE: Duration = Duration::from_millis(100);

/// Where to write records carrying `tag`.
#[derive(Debug, Clone)]
pub struct SubsetOutput {
    pub path: PathBuf,
    pub tag: String,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// Name of the ADS library.
    pub library: String,
    pub records_path: PathBuf,
    /// `None` when the subset stage is disabled.
    pub subset: Option<SubsetOutput>,
    /// `None` when no metrics summary was requested.
    pub metrics_path: Option<PathBuf>,
    pub delta_year: Option<i64>,
    /// Read the records file back instead of fetching.
    pub metrics_only: bool,
    pub mapper: Mapper,
    pub pause: Duration,
    pub retry: RetryPolicy,
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub records: usize,
    pub subset: Option<usize>,
    pub metrics: Option<Totals>,
}

/// Run the sync. `today` dates the metrics snapshot and bounds the citation series.
pub fn run(api: &impl Upstream, opts: &Options, today: NaiveDate) -> anyhow::Result<Outcome> {
    let mut outcome = Outcome::default();

    let records = if opts.metrics_only {
        let path = &opts.records_path;
        if !path.exists() {
            bail!("{} not found; run without --metrics-only first.", path.display());
        }
        let records = output::read_records(path)?;
        log::info!("read {} records from {}", records.len(), path.display());
        records
    } else {
        let records = fetch_records(api, opts)?;
        output::write_yaml(&opts.records_path, &records)?;
        log::info!("wrote {} records to {}", records.len(), opts.records_path.display());

        match &opts.subset {
            Some(subset) => {
                let selected = tags::filter_by_tag(&records, &subset.tag);
                output::write_yaml(&subset.path, &selected)?;
                log::info!(
                    "wrote {} \"{}\" records to {}",
                    selected.len(),
                    subset.tag,
                    subset.path.display()
                );
                outcome.subset = Some(selected.len());
            }
            None => log::debug!("subset output disabled"),
        }
        records
    };
    outcome.records = records.len();

    if let Some(path) = &opts.metrics_path {
        let bibcodes: Vec<String> = records
            .iter()
            .filter(|r| !r.bibcode.is_empty())
            .map(|r| r.bibcode.clone())
            .collect();
        let raw = metrics::fetch_with_retry(api, &bibcodes, opts.retry)?;

        let current = i64::from(today.year());
        let years = Years {
            reference: metrics::reference_year(
                opts.delta_year,
                output::read_existing_delta_year(path),
                current,
            ),
            current,
        };
        let summary = metrics::summarize(&raw, &records, years, today.format("%Y-%m-%d").to_string());
        output::write_yaml(path, &summary)?;
        log::info!("wrote metrics for {} to {}", years.reference, path.display());
        outcome.metrics = Some(summary.metrics);
    }

    Ok(outcome)
}

fn fetch_records(api: &impl Upstream, opts: &Options) -> anyhow::Result<Vec<Record>> {
    let id = library::find_library_id(api, &opts.library)?;
    let bibcodes = library::library_bibcodes(api, &id)?;
    let docs = search::fetch_records(api, &bibcodes, opts.pause)?;

    let month_candidates: Vec<String> = docs
        .iter()
        .filter(|d| record::is_refereed(d) && !is_preprint_venue(&d.text("pub")))
        .map(|d| d.text("bibcode"))
        .filter(|b| !b.is_empty())
        .collect();
    let months = search::fetch_months(api, &month_candidates)
        .with_context(|| format!("failed to recover months for library \"{}\"", opts.library))?;

    let mut records: Vec<Record> = docs.iter().map(|d| opts.mapper.map(d, &months)).collect();
    record::sort_newest_first(&mut records);
    Ok(records)
}
