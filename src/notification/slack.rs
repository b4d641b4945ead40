//! A client for posting messages through the Slack Web API.

use crate::notification::{ChatTransport, DeliveryError, DEFAULT_TIMEOUT};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// The public Slack Web API endpoint.
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// A blocking client for Slack's `chat.postMessage` method.
///
/// The underlying `reqwest` client pools connections and is safe to share
/// between threads.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Creates a new `SlackClient` authenticated with a bot or user token.
    pub fn new(token: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    /// Creates a new `SlackClient` whose requests give up after `timeout`.
    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
            base_url: SLACK_API_URL.to_string(),
        })
    }

    /// Points the client at a different API root, e.g. a proxy or test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ChatTransport for SlackClient {
    #[instrument(skip(self, text), fields(len = text.len()))]
    fn post_message(&self, channel: &str, text: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let payload = json!({ "channel": channel, "text": text });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = %status, body = %body, "Slack rejected the request");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Slack reports most failures as 200 with `"ok": false`.
        let body: Value = response.json()?;
        if body.get("ok").and_then(Value::as_bool) == Some(true) {
            debug!("Posted message to Slack.");
            Ok(())
        } else {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            error!(error = %reason, "Slack API returned an error");
            Err(DeliveryError::Api(reason))
        }
    }
}
