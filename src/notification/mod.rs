//! Transports that carry formatted log messages to external services.
//!
//! Sinks only see the `ChatTransport` and `SmsTransport` traits; the Slack
//! and Twilio clients in this module are the production implementations.
pub mod slack;
pub mod twilio;

use std::time::Duration;
use thiserror::Error;

pub use slack::SlackClient;
pub use twilio::TwilioClient;

/// Request timeout applied to transports unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single delivery attempt failed.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("service returned an error: {0}")]
    Api(String),

    #[error("{0}")]
    Other(String),
}

/// A chat service that can post a text message to a channel.
pub trait ChatTransport: Send + Sync {
    fn post_message(&self, channel: &str, text: &str) -> Result<(), DeliveryError>;
}

/// An SMS service that can send one message to one recipient.
pub trait SmsTransport: Send + Sync {
    fn create_message(&self, body: &str, to: &str, from: &str) -> Result<(), DeliveryError>;
}
