//! log-dispatch - Turns log records into chat and SMS notifications
//!
//! This library provides log sinks that format records and deliver them to
//! Slack and Twilio, isolating every delivery failure from the logging caller.
pub mod bridge;
pub mod cli;
pub mod config;
pub mod core;
pub mod formatting;
pub mod notification;
pub mod sinks;

// Re-export core types for convenience
pub use crate::core::*;
pub use bridge::SinkLogger;
pub use formatting::{PatternFormatter, TextFormatter, DEFAULT_FORMAT};
pub use notification::{ChatTransport, DeliveryError, SmsTransport};
pub use sinks::{ChatSink, SmsSink};
