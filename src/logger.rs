//! Console logger for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Prints records to stdout as `[YYYY-MM-DD HH:MM:SS] LEVEL message`.
pub struct StdoutLogger {
    level: LevelFilter,
}

impl StdoutLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Installs a logger with the given max level as the global `log` backend.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn format(&self, record: &Record) -> String {
        format!("[{}] {:<5} {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(), record.args())
    }
}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}
