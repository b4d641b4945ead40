#![allow(dead_code)]
//! A mock SMS transport that can fail for chosen recipients.

use log_dispatch::{DeliveryError, SmsTransport};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq)]
pub struct SentSms {
    pub body: String,
    pub to: String,
    pub from: String,
}

/// Records every attempt, including the ones it fails.
#[derive(Clone, Debug, Default)]
pub struct MockSmsTransport {
    pub attempts: Arc<Mutex<Vec<SentSms>>>,
    pub failing_recipients: HashSet<String>,
}

impl MockSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects messages addressed to any of `recipients`.
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing_recipients: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> Vec<SentSms> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempted_recipients(&self) -> Vec<String> {
        self.attempts().into_iter().map(|sms| sms.to).collect()
    }
}

impl SmsTransport for MockSmsTransport {
    fn create_message(&self, body: &str, to: &str, from: &str) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(SentSms {
            body: body.to_string(),
            to: to.to_string(),
            from: from.to_string(),
        });
        if self.failing_recipients.contains(to) {
            Err(DeliveryError::Rejected {
                status: 400,
                body: format!("Invalid 'To' Phone Number: {}", to),
            })
        } else {
            Ok(())
        }
    }
}
