//! A client for sending SMS through the Twilio Messages API.

use crate::notification::{DeliveryError, SmsTransport, DEFAULT_TIMEOUT};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// The public Twilio REST endpoint.
pub const TWILIO_API_URL: &str = "https://api.twilio.com";

/// A blocking client for Twilio's Messages resource.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: reqwest::blocking::Client,
    account_sid: String,
    auth_token: String,
    base_url: String,
}

impl TwilioClient {
    /// Creates a new `TwilioClient` for the given account credentials.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(account_sid, auth_token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url: TWILIO_API_URL.to_string(),
        })
    }

    /// Points the client at a different API root, e.g. a proxy or test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

impl SmsTransport for TwilioClient {
    #[instrument(skip(self, body), fields(len = body.len()))]
    fn create_message(&self, body: &str, to: &str, from: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("To", to), ("From", from)])
            .send()?;

        let status = response.status();
        if status.is_success() {
            debug!("Queued SMS with Twilio.");
            Ok(())
        } else {
            let text = response.text().unwrap_or_default();
            error!(status = %status, body = %text, "Twilio rejected the message");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[cfg(test)]
mod twilio_client_tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";

    async fn send(server: &MockServer, to: &'static str) -> Result<(), DeliveryError> {
        let base_url = server.uri();
        tokio::task::spawn_blocking(move || -> Result<(), DeliveryError> {
            let client = TwilioClient::new("AC123", "secret")?.with_base_url(base_url);
            client.create_message("[ERROR] disk full", to, "+15550000")
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_twilio_client_create_message_success() {
        // Arrange
        let server = MockServer::start().await;
        // base64("AC123:secret")
        Mock::given(method("POST"))
            .and(path(MESSAGES_PATH))
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .and(body_string_contains("To=%2B15551111"))
            .and(body_string_contains("From=%2B15550000"))
            .and(body_string_contains("Body=%5BERROR%5D+disk+full"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        // Act
        let result = send(&server, "+15551111").await;

        // Assert
        assert!(result.is_ok(), "unexpected error: {:?}", result);
    }

    #[tokio::test]
    async fn test_twilio_client_handles_invalid_recipient() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MESSAGES_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"code":21211,"message":"Invalid 'To' Phone Number"}"#),
            )
            .mount(&server)
            .await;

        // Act
        let result = send(&server, "not-a-number").await;

        // Assert
        match result {
            Err(DeliveryError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("21211"));
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_host_is_http_error() {
        let client = TwilioClient::with_timeout("AC123", "secret", Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        let result = client.create_message("hi", "+1", "+2");

        assert!(matches!(result, Err(DeliveryError::Http(_))));
    }
}
