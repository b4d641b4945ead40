#![allow(dead_code)]
//! A mock chat transport for testing sink behavior without a network.

use log_dispatch::{ChatTransport, DeliveryError};
use std::sync::{Arc, Mutex};

/// Records every posted message and optionally fails them all.
#[derive(Clone, Debug, Default)]
pub struct MockChatTransport {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockChatTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns the `(channel, text)` pairs posted so far.
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChatTransport for MockChatTransport {
    fn post_message(&self, channel: &str, text: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        if self.fail {
            Err(DeliveryError::Api("invalid_auth".to_string()))
        } else {
            Ok(())
        }
    }
}
