//! A sink that texts every record to a list of phone numbers.

use crate::core::{Delivery, ErrorHook, LogRecord, LogSink, StderrHook};
use crate::formatting::{PatternFormatter, TextFormatter};
use crate::notification::{SmsTransport, TwilioClient};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Sends each record to every recipient, in the configured order.
///
/// There is no level threshold: every record handed to this sink is sent.
/// A failure for one recipient is reported to the error hook and the
/// remaining recipients are still attempted.
pub struct SmsSink {
    transport: Arc<dyn SmsTransport>,
    sender: String,
    recipients: Vec<String>,
    formatter: Box<dyn TextFormatter>,
    error_hook: Arc<dyn ErrorHook>,
}

impl SmsSink {
    pub fn new(
        transport: Arc<dyn SmsTransport>,
        sender: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            recipients,
            formatter: Box::new(PatternFormatter::default()),
            error_hook: Arc::new(StderrHook),
        }
    }

    /// Creates a sink backed by the Twilio Messages API.
    pub fn twilio(client: TwilioClient, sender: impl Into<String>, recipients: Vec<String>) -> Self {
        Self::new(Arc::new(client), sender, recipients)
    }

    pub fn with_formatter(mut self, formatter: Box<dyn TextFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
        self.error_hook = hook;
        self
    }

    /// Sends one record to every recipient, returning one outcome per recipient.
    #[instrument(skip_all, fields(recipients = self.recipients.len(), level = %record.level))]
    pub fn dispatch(&self, record: &LogRecord) -> Vec<Delivery> {
        let content = self.formatter.format(record);

        self.recipients
            .iter()
            .map(|recipient| {
                match self.transport.create_message(&content, recipient, &self.sender) {
                    Ok(()) => {
                        debug!(%recipient, "Delivered record by SMS.");
                        Delivery::Delivered
                    }
                    Err(e) => {
                        self.error_hook.handle_error(record, &e);
                        Delivery::Failed(e)
                    }
                }
            })
            .collect()
    }
}

impl LogSink for SmsSink {
    fn name(&self) -> &str {
        "sms"
    }

    fn handle(&self, record: &LogRecord) {
        self.dispatch(record);
    }
}
