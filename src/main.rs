use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use crate::{ads::client::AdsClient, cli::Cli, config::Config, pipeline::Outcome};

mod ads;
mod author;
mod cli;
mod config;
mod identifier;
mod logging;
mod metrics;
mod output;
mod pipeline;
mod record;
mod sortdate;
mod tags;
mod text;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init_logging(args.quiet, args.debug);

    let config = Config::load(args.config.as_deref())?;
    let token = config.api.require_token()?;
    let opts = args.options(&config);

    let client = AdsClient::new(&config.api.base_url, token, config.api.timeouts())?;
    let outcome = pipeline::run(&client, &opts, chrono::Local::now().date_naive())?;

    if !args.quiet {
        print_summary(&outcome);
    }
    Ok(())
}

fn print_summary(outcome: &Outcome) {
    eprintln!(
        "{} {}",
        "✓".if_supports_color(Stream::Stderr, |s| s.green()),
        summary_line(outcome)
    );
}

fn summary_line(outcome: &Outcome) -> String {
    let mut parts = vec![format!("{} records", outcome.records)];
    if let Some(n) = outcome.subset {
        parts.push(format!("{n} in subset"));
    }
    if let Some(m) = &outcome.metrics {
        parts.push(format!(
            "{} citations, h={} ({:+}), g={} ({:+})",
            m.total_citations, m.h_index, m.deltas.h_index, m.g_index, m.deltas.g_index
        ));
    }
    parts.join(", ")
}
