//! A sink that posts one annotated message per record to a chat channel.

use crate::core::{Delivery, ErrorHook, Level, LogRecord, LogSink, StderrHook};
use crate::formatting::{slack_icon, PatternFormatter, TextFormatter};
use crate::notification::{ChatTransport, SlackClient};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Delivers records at or above a minimum level to a fixed chat channel.
///
/// Each message is prefixed with the record's `slack_icon` when it has one,
/// otherwise with the icon mapped to its level.
pub struct ChatSink {
    transport: Arc<dyn ChatTransport>,
    channel: String,
    formatter: Box<dyn TextFormatter>,
    min_level: Level,
    error_hook: Arc<dyn ErrorHook>,
}

impl ChatSink {
    /// Creates a sink that accepts every level and uses the default pattern.
    pub fn new(transport: Arc<dyn ChatTransport>, channel: impl Into<String>) -> Self {
        Self {
            transport,
            channel: channel.into(),
            formatter: Box::new(PatternFormatter::default()),
            min_level: Level::NotSet,
            error_hook: Arc::new(StderrHook),
        }
    }

    /// Creates a sink backed by the Slack Web API.
    pub fn slack(client: SlackClient, channel: impl Into<String>) -> Self {
        Self::new(Arc::new(client), channel)
    }

    pub fn with_formatter(mut self, formatter: Box<dyn TextFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Records below `level` are dropped without contacting the transport.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
        self.error_hook = hook;
        self
    }

    /// Builds the annotated message text for a record.
    pub fn render(&self, record: &LogRecord) -> String {
        let icon = record
            .slack_icon
            .as_deref()
            .unwrap_or_else(|| slack_icon(record.level));
        format!("{} {}", icon, self.formatter.format(record))
    }

    /// Delivers one record and reports what happened.
    #[instrument(skip_all, fields(channel = %self.channel, level = %record.level))]
    pub fn dispatch(&self, record: &LogRecord) -> Delivery {
        if record.level < self.min_level {
            return Delivery::Skipped;
        }

        let content = self.render(record);
        match self.transport.post_message(&self.channel, &content) {
            Ok(()) => {
                debug!("Delivered record to chat channel.");
                Delivery::Delivered
            }
            Err(e) => {
                self.error_hook.handle_error(record, &e);
                Delivery::Failed(e)
            }
        }
    }
}

impl LogSink for ChatSink {
    fn name(&self) -> &str {
        "chat"
    }

    fn handle(&self, record: &LogRecord) {
        self.dispatch(record);
    }
}
