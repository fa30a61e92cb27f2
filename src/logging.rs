//! Process-wide `log` backend.
//!
//! Records go to stderr. In `serve` stdout carries the board renders, and in
//! `bot` it is the protocol channel itself, so nothing else may write there.
//! A closed stderr drops records instead of panicking.

use std::env;
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

/// Environment variable holding the level filter (`error` .. `trace`, `off`).
pub const LOG_ENV: &str = "GRIDMATCH_LOG";

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "[{} {}] pid={} {}",
            record.level(),
            record.target(),
            std::process::id(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger with the level from `GRIDMATCH_LOG`, `info` if unset.
pub fn init_logging() {
    init_logging_with_default(LevelFilter::Info);
}

/// Same as [`init_logging`] with a caller-chosen fallback level. Only the
/// first call in a process takes effect.
pub fn init_logging_with_default(default: LevelFilter) {
    let level = level_from(env::var(LOG_ENV).ok().as_deref(), default);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn level_from(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .map(str::trim)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
