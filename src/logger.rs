use log::{self, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes `LEVEL target message` lines to standard error.
pub struct Logger(LevelFilter);

impl Logger {
    pub fn install(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Logger(level)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.0
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {:>28} {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}
