//! Stderr logger: `[LEVEL target] message`, one line per record.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl StderrLogger {
    /// Register as the global logger. Only the first call succeeds.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Keep one record on one line
        let msg = record.args().to_string().replace('\n', "\\n");
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "[{} {}] {}", record.level(), record.target(), msg);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
