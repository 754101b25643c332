//! Minimal `log` backend writing to stderr
//!
//! Lines carry the time since the logger was installed, the level and the
//! module path, e.g. `[   1.250s INFO  tt_demo] heartbeat`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger {
    level: LevelFilter,
    start: Instant,
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.elapsed();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:>4}.{:03}s {:<5} {}] {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.module_path().unwrap_or("?"),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger at the given level
///
/// Fails if another logger has already been installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        start: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
