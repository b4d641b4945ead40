#![allow(dead_code)]
pub mod mock_chat;
pub mod mock_sms;

use log_dispatch::{DeliveryError, LogRecord};
use std::sync::{Arc, Mutex};

/// An error hook that remembers every failure it was handed.
#[derive(Clone, Default)]
pub struct RecordingHook {
    pub failures: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(record message, error text)` pairs in the order they arrived.
    pub fn failures(&self) -> Vec<(String, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl log_dispatch::ErrorHook for RecordingHook {
    fn handle_error(&self, record: &LogRecord, error: &DeliveryError) {
        self.failures
            .lock()
            .unwrap()
            .push((record.message.clone(), error.to_string()));
    }
}
