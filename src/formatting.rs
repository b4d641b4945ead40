// src/formatting.rs

use crate::core::{Level, LogRecord};
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;
use thiserror::Error;

/// The message layout used when no pattern is configured.
pub const DEFAULT_FORMAT: &str = "[{level}] [{timestamp}] [{logger}] - {message}";

/// The timestamp layout used by `{timestamp}` unless overridden.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// The marker used for `NOTSET` and as the generic fallback.
pub const DEFAULT_ICON: &str = ":loudspeaker:";

/// Returns the Slack emoji that annotates a record of the given level.
pub fn slack_icon(level: Level) -> &'static str {
    match level {
        Level::NotSet => DEFAULT_ICON,
        Level::Debug => ":speaker:",
        Level::Info => ":information_source:",
        Level::Warning => ":warning:",
        Level::Error => ":exclamation:",
        Level::Critical => ":boom:",
    }
}

/// A trait for turning a log record into display text.
pub trait TextFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unknown placeholder {{{name}}} at offset {offset}")]
    UnknownPlaceholder { name: String, offset: usize },

    #[error("unterminated placeholder starting at offset {0}")]
    Unterminated(usize),

    #[error("unmatched '}}' at offset {0}")]
    StrayBrace(usize),

    #[error("invalid timestamp format {0:?}")]
    InvalidTimeFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Level,
    Timestamp,
    Logger,
    Message,
    Module,
    File,
    Line,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "level" => Some(Field::Level),
            "timestamp" => Some(Field::Timestamp),
            "logger" => Some(Field::Logger),
            "message" => Some(Field::Message),
            "module" => Some(Field::Module),
            "file" => Some(Field::File),
            "line" => Some(Field::Line),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A formatter driven by a `{placeholder}` pattern.
///
/// Recognized placeholders are `{level}`, `{timestamp}`, `{logger}`,
/// `{message}`, `{module}`, `{file}` and `{line}`. Use `{{` and `}}` for
/// literal braces. The pattern is compiled once; formatting never fails and
/// absent optional fields render as empty text.
///
/// `{timestamp}` is always rendered in UTC. A `%z` or `%:z` in the layout
/// prints `+0000`.
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    segments: Vec<Segment>,
    time_format: String,
}

impl PatternFormatter {
    /// Compiles `pattern` with the default timestamp layout.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::with_time_format(pattern, DEFAULT_TIME_FORMAT)
    }

    /// Compiles `pattern`, rendering `{timestamp}` with a `chrono` strftime layout.
    pub fn with_time_format(pattern: &str, time_format: &str) -> Result<Self, PatternError> {
        if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
            return Err(PatternError::InvalidTimeFormat(time_format.to_string()));
        }
        Ok(Self {
            segments: parse_pattern(pattern)?,
            time_format: time_format.to_string(),
        })
    }

    fn write_field(&self, out: &mut String, field: Field, record: &LogRecord) {
        match field {
            Field::Level => out.push_str(record.level.as_str()),
            Field::Timestamp => {
                // The layout was validated at construction.
                let _ = write!(out, "{}", record.timestamp.format(&self.time_format));
            }
            Field::Logger => out.push_str(&record.logger),
            Field::Message => out.push_str(&record.message),
            Field::Module => out.push_str(record.module_path.as_deref().unwrap_or_default()),
            Field::File => out.push_str(record.file.as_deref().unwrap_or_default()),
            Field::Line => {
                if let Some(line) = record.line {
                    let _ = write!(out, "{}", line);
                }
            }
        }
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self {
            segments: parse_pattern(DEFAULT_FORMAT).unwrap_or_default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl TextFormatter for PatternFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(record.message.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => self.write_field(&mut out, *field, record),
            }
        }
        out
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, next)| next) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(PatternError::Unterminated(offset));
                }
                let field = Field::from_name(name.trim())
                    .ok_or(PatternError::UnknownPlaceholder { name, offset })?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
            }
            '}' if chars.peek().map(|&(_, next)| next) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(PatternError::StrayBrace(offset)),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn create_test_record() -> LogRecord {
        LogRecord::new(Level::Warning, "payments.worker", "queue depth 512")
            .with_timestamp(Utc.with_ymd_and_hms(2025, 7, 8, 21, 3, 52).unwrap())
    }

    #[test]
    fn test_default_pattern() {
        let formatter = PatternFormatter::default();
        let line = formatter.format(&create_test_record());

        let expected = "[WARNING] [2025-07-08 21:03:52,000] [payments.worker] - queue depth 512";
        assert_eq!(line, expected);
    }

    #[test]
    fn test_default_matches_compiled_default_pattern() {
        let record = create_test_record();
        let compiled = PatternFormatter::new(DEFAULT_FORMAT).unwrap();
        assert_eq!(compiled.format(&record), PatternFormatter::default().format(&record));
    }

    #[test]
    fn test_custom_pattern_and_time_format() {
        let formatter = PatternFormatter::with_time_format("{timestamp} {level}: {message}", "%H:%M").unwrap();
        assert_eq!(formatter.format(&create_test_record()), "21:03 WARNING: queue depth 512");
    }

    #[test]
    fn test_timestamp_renders_in_utc() {
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 7, 8, 23, 3, 52)
            .unwrap();
        let record = LogRecord::new(Level::Info, "x", "y").with_timestamp(local.with_timezone(&Utc));
        let formatter = PatternFormatter::with_time_format("{timestamp}", "%H:%M %:z").unwrap();

        assert_eq!(formatter.format(&record), "21:03 +00:00");
    }

    #[test]
    fn test_missing_location_renders_empty() {
        let formatter = PatternFormatter::new("{module}|{file}:{line}|{message}").unwrap();
        assert_eq!(formatter.format(&create_test_record()), "|:|queue depth 512");

        let located = create_test_record().with_location(Some("pay::worker"), Some("src/worker.rs"), Some(88));
        assert_eq!(formatter.format(&located), "pay::worker|src/worker.rs:88|queue depth 512");
    }

    #[test]
    fn test_escaped_braces() {
        let formatter = PatternFormatter::new("{{{level}}} {{literal}}").unwrap();
        assert_eq!(formatter.format(&create_test_record()), "{WARNING} {literal}");
    }

    #[test]
    fn test_message_braces_are_not_interpreted() {
        let formatter = PatternFormatter::new("{message}").unwrap();
        let record = LogRecord::new(Level::Info, "x", "payload {level} {");
        assert_eq!(formatter.format(&record), "payload {level} {");
    }

    #[test]
    fn test_format_is_deterministic() {
        let formatter = PatternFormatter::default();
        let record = create_test_record();
        assert_eq!(formatter.format(&record), formatter.format(&record));
    }

    #[test]
    fn test_pattern_errors() {
        assert_eq!(
            PatternFormatter::new("[{levelname}]").unwrap_err(),
            PatternError::UnknownPlaceholder {
                name: "levelname".to_string(),
                offset: 1
            }
        );
        assert_eq!(
            PatternFormatter::new("abc {message").unwrap_err(),
            PatternError::Unterminated(4)
        );
        assert_eq!(PatternFormatter::new("a } b").unwrap_err(), PatternError::StrayBrace(2));
        assert!(matches!(
            PatternFormatter::with_time_format("{timestamp}", "%Y-%m-%").unwrap_err(),
            PatternError::InvalidTimeFormat(_)
        ));
    }

    #[test]
    fn test_slack_icon_covers_every_level() {
        assert_eq!(slack_icon(Level::NotSet), DEFAULT_ICON);
        assert_eq!(slack_icon(Level::Debug), ":speaker:");
        assert_eq!(slack_icon(Level::Info), ":information_source:");
        assert_eq!(slack_icon(Level::Warning), ":warning:");
        assert_eq!(slack_icon(Level::Error), ":exclamation:");
        assert_eq!(slack_icon(Level::Critical), ":boom:");
    }
}
