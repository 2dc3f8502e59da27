//! Logging to stderr through `env_logger`, routed around live progress bars.

use indicatif::{MultiProgress, ProgressBar};
use log::Log;
use once_cell::sync::Lazy;
use owo_colors::{OwoColorize, Stream};

static MULTI: Lazy<MultiProgress> = Lazy::new(MultiProgress::new);

/// Register a progress bar so log lines are printed above it instead of through it.
pub fn attach(bar: ProgressBar) -> ProgressBar {
    MULTI.add(bar)
}

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

fn colored_label(level: log::Level) -> String {
    let label = level_label(level);
    match level {
        log::Level::Error => label.if_supports_color(Stream::Stderr, |l| l.red()).to_string(),
        log::Level::Warn => label.if_supports_color(Stream::Stderr, |l| l.yellow()).to_string(),
        log::Level::Info => label.if_supports_color(Stream::Stderr, |l| l.green()).to_string(),
        _ => label.if_supports_color(Stream::Stderr, |l| l.cyan()).to_string(),
    }
}

/// Logger that prints through the shared `MultiProgress`, suspending any bars while it writes.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.matches(record) {
            let line = format!("[{}] {}", colored_label(record.level()), record.args());
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Default level is `info`; `--debug` lowers it, `--quiet` raises it to `warn`. `RUST_LOG`
/// overrides both.
pub fn default_level(quiet: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

pub fn init_logging(quiet: bool, debug: bool) {
    let logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level(quiet, debug)),
    )
    .build();
    let max_level = logger.filter();

    let wrapped = IndicatifLogger {
        inner: logger,
        multi: MULTI.clone(),
    };
    if log::set_boxed_logger(Box::new(wrapped)).is_ok() {
        log::set_max_level(max_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_wins_over_quiet() {
        assert_eq!(default_level(false, false), "info");
        assert_eq!(default_level(true, false), "warn");
        assert_eq!(default_level(true, true), "debug");
    }

    #[test]
    fn labels_are_aligned() {
        for level in [log::Level::Error, log::Level::Warn, log::Level::Info, log::Level::Trace] {
            assert_eq!(level_label(level).len(), 5);
        }
    }

    #[test]
    fn logger_respects_filter() {
        let inner = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .build();
        let logger = IndicatifLogger {
            inner,
            multi: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
        };
        let meta = |level| log::Metadata::builder().level(level).target("ads_pubs").build();
        assert!(logger.enabled(&meta(log::Level::Warn)));
        assert!(!logger.enabled(&meta(log::Level::Debug)));
    }

    #[test]
    fn attached_bars_share_the_log_target() {
        let bar = attach(ProgressBar::hidden());
        bar.inc(1);
        assert_eq!(bar.position(), 1);
        bar.finish_and_clear();
    }
}
