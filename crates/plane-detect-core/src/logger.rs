//! Stderr logging for the detection crates.
//!
//! Records from `plane_detect*` targets pass at the configured level, while
//! dependencies are capped at `warn`. Lines look like
//! `    0.0123s DEBUG ransac: best=...`, with the crate prefix dropped from
//! the target.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_TARGET: &str = "plane_detect";
const FOREIGN_LEVEL: Level = Level::Warn;

/// Level filter for a repeated `-v` flag: warnings only, then info, debug
/// and trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn is_own_target(target: &str) -> bool {
    target.starts_with(OWN_TARGET)
}

/// Target with the crate name stripped, e.g. `detector::pipeline`.
fn stage(target: &str) -> &str {
    if !is_own_target(target) {
        return target;
    }
    target.split_once("::").map_or(target, |(_, rest)| rest)
}

fn format_line(elapsed: f64, record: &Record) -> String {
    format!(
        "{elapsed:>9.4}s {:<5} {}: {}",
        record.level(),
        stage(record.target()),
        record.args()
    )
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn allows(&self, level: Level, target: &str) -> bool {
        if is_own_target(target) {
            level <= self.level
        } else {
            level <= FOREIGN_LEVEL && level <= self.level
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.allows(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(self.started.elapsed().as_secs_f64(), record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger at `level`.
///
/// The first call wins; later calls leave the installed logger untouched.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise the detection crates log at
/// `level` and everything else at `warn`.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let own = level.to_string().to_ascii_lowercase();
        EnvFilter::new(format!(
            "warn,{OWN_TARGET}={own},{OWN_TARGET}_core={own}"
        ))
    });
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
