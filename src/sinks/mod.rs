//! Log sinks that deliver records to chat and SMS destinations.
pub mod chat;
pub mod sms;

pub use chat::ChatSink;
pub use sms::SmsSink;
