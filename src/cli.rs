use std::path::PathBuf;

use clap::Parser;

use crate::author::Owner;
use crate::config::Config;
use crate::metrics::RetryPolicy;
use crate::pipeline::{BATCH_PAUSE, Options, SubsetOutput};
use crate::record::Mapper;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the ADS library holding the publication list
    #[arg(value_name = "LIBRARY")]
    pub library: Option<String>,

    /// Where to write every record
    #[arg(value_name = "OUT_ALL")]
    pub out_all: Option<PathBuf>,

    /// Write the tagged subset, optionally to PATH (needs --write-subset or `subset.enabled`)
    #[arg(long, value_name = "PATH")]
    pub sdss: Option<Option<PathBuf>>,

    /// Write the metrics summary, optionally to PATH
    #[arg(long, value_name = "PATH")]
    pub metrics: Option<Option<PathBuf>>,

    /// Year the metrics deltas refer to [default: the stored year, else the current year]
    #[arg(long, value_name = "YEAR")]
    pub delta_year: Option<i64>,

    /// Skip fetching records; read OUT_ALL back and only refresh metrics
    #[arg(long)]
    pub metrics_only: bool,

    /// Enable the tagged subset output
    #[arg(long)]
    pub write_subset: bool,

    /// Read configuration from this TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    pub debug: bool,

    /// Only log warnings and errors
    #[arg(long, conflicts_with = "debug")]
    pub quiet: bool,
}

impl Cli {
    /// Run options from the arguments, with `config` filling in whatever was not given.
    pub fn options(&self, config: &Config) -> Options {
        let out = &config.output;

        let subset = match &self.sdss {
            Some(path) if self.write_subset || config.subset.enabled => Some(SubsetOutput {
                path: path.clone().unwrap_or_else(|| out.subset.clone()),
                tag: config.subset.tag.clone(),
            }),
            _ => None,
        };

        let metrics_path = match &self.metrics {
            Some(path) => Some(path.clone().unwrap_or_else(|| out.metrics.clone())),
            None if self.metrics_only => Some(out.metrics.clone()),
            None => None,
        };

        Options {
            library: self.library.clone().unwrap_or_else(|| out.library.clone()),
            records_path: self.out_all.clone().unwrap_or_else(|| out.records.clone()),
            subset,
            metrics_path,
            delta_year: self.delta_year,
            metrics_only: self.metrics_only,
            mapper: Mapper {
                owner: Owner::new(config.owner.surnames.as_slice()),
                max_authors: config.owner.max_authors,
            },
            pause: BATCH_PAUSE,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ads-pubs").chain(args.iter().copied())).expect("parse")
    }

    #[test]
    fn defaults_from_config() {
        let opts = parse(&[]).options(&Config::default());
        assert_eq!(opts.library, "JIV");
        assert_eq!(opts.records_path, PathBuf::from("_data/papers_all.yml"));
        assert!(opts.subset.is_none());
        assert!(opts.metrics_path.is_none());
        assert!(!opts.metrics_only);
        assert_eq!(opts.mapper.max_authors, 8);
    }

    #[test]
    fn positionals_override_config() {
        let opts = parse(&["Mine", "site/all.yml"]).options(&Config::default());
        assert_eq!(opts.library, "Mine");
        assert_eq!(opts.records_path, PathBuf::from("site/all.yml"));
    }

    #[test]
    fn bare_flags_take_default_paths() {
        let opts = parse(&["--metrics", "--sdss", "--write-subset"]).options(&Config::default());
        assert_eq!(opts.metrics_path, Some(PathBuf::from("_data/ads_metrics.yml")));
        let subset = opts.subset.expect("subset enabled");
        assert_eq!(subset.path, PathBuf::from("_data/papers_sdssv.yml"));
        assert_eq!(subset.tag, "sdssv");
    }

    #[test]
    fn flags_with_paths() {
        let opts = parse(&["--metrics", "m.yml", "--delta-year", "2023"]).options(&Config::default());
        assert_eq!(opts.metrics_path, Some(PathBuf::from("m.yml")));
        assert_eq!(opts.delta_year, Some(2023));
    }

    #[test]
    fn subset_needs_enabling() {
        let opts = parse(&["--sdss", "s.yml"]).options(&Config::default());
        assert!(opts.subset.is_none());

        let mut config = Config::default();
        config.subset.enabled = true;
        config.subset.tag = "bloem".into();
        let subset = parse(&["--sdss", "s.yml"]).options(&config).subset.expect("enabled");
        assert_eq!(subset.path, PathBuf::from("s.yml"));
        assert_eq!(subset.tag, "bloem");

        assert!(parse(&["--write-subset"]).options(&config).subset.is_none());
    }

    #[test]
    fn metrics_only_implies_metrics_path() {
        let opts = parse(&["--metrics-only"]).options(&Config::default());
        assert!(opts.metrics_only);
        assert_eq!(opts.metrics_path, Some(PathBuf::from("_data/ads_metrics.yml")));
    }

    #[test]
    fn rejects_bad_year_and_conflicting_verbosity() {
        assert!(Cli::try_parse_from(["ads-pubs", "--delta-year", "soon"]).is_err());
        assert!(Cli::try_parse_from(["ads-pubs", "--debug", "--quiet"]).is_err());
    }

    #[test]
    fn any_library_name_is_accepted() {
        proptest::proptest!(|(name in "[A-Za-z][A-Za-z0-9 _]{0,24}")| {
            let cli = parse(&[name.as_str()]);
            proptest::prop_assert_eq!(cli.options(&Config::default()).library, name);
        })
    }
}
