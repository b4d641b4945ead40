//! Installs sinks behind the `log` facade.
//!
//! `SinkLogger` implements `log::Log`, converts each `log::Record` into a
//! `LogRecord` and hands it to every configured sink. A structured
//! key-value pair named `slack_icon` becomes the record's icon override:
//!
//! ```ignore
//! log::error!(slack_icon = ":fire:"; "checkout service is down");
//! ```

use crate::core::{LogRecord, LogSink};
use log::kv::Key;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// The key-value name carrying a per-record icon override.
pub const SLACK_ICON_KEY: &str = "slack_icon";

/// Targets that are never forwarded. The HTTP stack logs while a sink is
/// delivering, and forwarding those records would recurse.
const INTERNAL_TARGETS: [&str; 4] = ["log_dispatch", "reqwest", "hyper", "hyper_util"];

/// A `log::Log` implementation that fans records out to sinks.
pub struct SinkLogger {
    filter: LevelFilter,
    sinks: Vec<Box<dyn LogSink>>,
}

impl SinkLogger {
    pub fn new(filter: LevelFilter, sinks: Vec<Box<dyn LogSink>>) -> Self {
        Self { filter, sinks }
    }

    /// Registers this logger as the process-wide `log` backend.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.filter);
        log::set_boxed_logger(Box::new(self))
    }
}

fn is_internal(target: &str) -> bool {
    INTERNAL_TARGETS.iter().any(|prefix| {
        target == *prefix
            || target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter && !is_internal(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let record = LogRecord::from(record);
        for sink in &self.sinks {
            sink.handle(&record);
        }
    }

    fn flush(&self) {}
}

impl From<&Record<'_>> for LogRecord {
    fn from(record: &Record<'_>) -> Self {
        let mut converted = LogRecord::new(
            record.level().into(),
            record.target(),
            record.args().to_string(),
        )
        .with_location(record.module_path(), record.file(), record.line());

        if let Some(icon) = record.key_values().get(Key::from_str(SLACK_ICON_KEY)) {
            converted = converted.with_slack_icon(icon.to_string());
        }
        converted
    }
}
