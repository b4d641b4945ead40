//! Core domain types and service traits for log-dispatch
//!
//! This module defines the log record that flows through the system, the
//! `LogSink` contract every destination implements, and the error hook
//! that receives delivery failures.

use crate::notification::DeliveryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    #[default]
    NotSet,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Level; 6] = [
        Level::NotSet,
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// The upper-case display name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::NotSet => "NOTSET",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTSET" | "TRACE" => Ok(Level::NotSet),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" | "FATAL" => Ok(Level::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, ParseLevelError> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::NotSet,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warning,
            log::Level::Error => Level::Error,
        }
    }
}

/// A single log event, as handed to every sink.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity of the event.
    pub level: Level,
    /// The fully rendered message.
    pub message: String,
    /// Name of the logger that produced the record.
    pub logger: String,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Replaces the level-derived marker for chat delivery.
    pub slack_icon: Option<String>,
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger: logger.into(),
            timestamp: Utc::now(),
            slack_icon: None,
            module_path: None,
            file: None,
            line: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_slack_icon(mut self, icon: impl Into<String>) -> Self {
        self.slack_icon = Some(icon.into());
        self
    }

    /// Attaches the source location the record was emitted from.
    pub fn with_location(
        mut self,
        module_path: Option<&str>,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Self {
        self.module_path = module_path.map(str::to_string);
        self.file = file.map(str::to_string);
        self.line = line;
        self
    }
}

/// Outcome of a single delivery attempt.
#[derive(Debug)]
pub enum Delivery {
    /// The transport accepted the message.
    Delivered,
    /// The record was below the sink's threshold and nothing was sent.
    Skipped,
    /// The transport failed. The sink's error hook has already seen this error.
    Failed(DeliveryError),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Delivery::Failed(_))
    }
}

/// A destination that turns log records into outbound notifications.
///
/// `handle` never fails: delivery problems are routed to the sink's
/// `ErrorHook` so the logging call site always completes normally.
pub trait LogSink: Send + Sync {
    /// A short name for diagnostics, e.g. `"slack"`.
    fn name(&self) -> &str;

    /// Formats and delivers one record.
    fn handle(&self, record: &LogRecord);
}

/// Receives delivery failures that sinks swallow.
pub trait ErrorHook: Send + Sync {
    fn handle_error(&self, record: &LogRecord, error: &DeliveryError);
}

impl<F> ErrorHook for F
where
    F: Fn(&LogRecord, &DeliveryError) + Send + Sync,
{
    fn handle_error(&self, record: &LogRecord, error: &DeliveryError) {
        self(record, error)
    }
}

/// The default hook: writes a short report to stderr.
///
/// Write failures are ignored; there is nowhere left to report them.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrHook;

impl StderrHook {
    fn write_report(out: &mut impl Write, record: &LogRecord, error: &DeliveryError) -> std::io::Result<()> {
        writeln!(out, "--- Logging error ---")?;
        writeln!(out, "{}", error)?;
        writeln!(
            out,
            "Record: [{}] [{}] {}",
            record.level, record.logger, record.message
        )
    }
}

impl ErrorHook for StderrHook {
    fn handle_error(&self, record: &LogRecord, error: &DeliveryError) {
        let mut stderr = std::io::stderr().lock();
        let _ = Self::write_report(&mut stderr, record, error);
    }
}

/// Reports delivery failures as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl ErrorHook for TracingHook {
    fn handle_error(&self, record: &LogRecord, error: &DeliveryError) {
        tracing::error!(
            error = %error,
            level = %record.level,
            logger = %record.logger,
            "Failed to deliver log record"
        );
    }
}
