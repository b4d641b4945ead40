//! Configuration management for log-dispatch
//!
//! This module defines the `Config` struct and its sink sections. It uses
//! the `figment` crate to layer built-in defaults, a TOML file, environment
//! variables and command-line arguments, then turns the result into sinks.

use crate::cli::Cli;
use crate::core::{ErrorHook, Level, LogSink};
use crate::formatting::{PatternError, PatternFormatter, DEFAULT_FORMAT, DEFAULT_TIME_FORMAT};
use crate::notification::slack::SLACK_API_URL;
use crate::notification::twilio::TWILIO_API_URL;
use crate::notification::{SlackClient, TwilioClient, DEFAULT_TIMEOUT};
use crate::sinks::{ChatSink, SmsSink};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Prefix for environment overrides, e.g. `LOG_DISPATCH_SLACK__CHANNEL`.
pub const ENV_PREFIX: &str = "LOG_DISPATCH_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid format for the {sink} sink: {source}")]
    Pattern {
        sink: &'static str,
        #[source]
        source: PatternError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The filter for this program's own diagnostics.
    pub log_level: String,
    /// The `chrono` layout used for `{timestamp}` in every sink.
    pub time_format: String,
    /// Slack delivery. Absent means disabled.
    pub slack: Option<SlackConfig>,
    /// SMS delivery. Absent means disabled.
    pub sms: Option<SmsConfig>,
}

/// Configuration for the Slack chat sink.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SlackConfig {
    /// The Slack bot token.
    pub token: String,
    /// The channel name or id to post to.
    pub channel: String,
    /// Message pattern; defaults to `DEFAULT_FORMAT`.
    #[serde(default)]
    pub format: Option<String>,
    /// Records below this level are not posted.
    #[serde(default)]
    pub min_level: Level,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_slack_url")]
    pub base_url: String,
}

/// Configuration for the Twilio SMS sink.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// The "from" number for every message.
    pub sender: String,
    /// Numbers to text, in delivery order.
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_twilio_url")]
    pub base_url: String,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_slack_url() -> String {
    SLACK_API_URL.to_string()
}

fn default_twilio_url() -> String {
    TWILIO_API_URL.to_string()
}

impl Config {
    /// Builds the layered figment: defaults, config file, environment, then CLI.
    pub fn figment(cli: &Cli) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(cli.clone())
    }

    /// Loads the application configuration for the given command line.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::figment(cli).extract().map_err(|e| Box::new(e).into())
    }

    fn formatter(&self, sink: &'static str, pattern: Option<&str>) -> Result<PatternFormatter, ConfigError> {
        PatternFormatter::with_time_format(pattern.unwrap_or(DEFAULT_FORMAT), &self.time_format)
            .map_err(|source| ConfigError::Pattern { sink, source })
    }

    /// Creates a sink for every configured section.
    ///
    /// Every sink reports delivery failures to `error_hook`.
    pub fn build_sinks(&self, error_hook: Arc<dyn ErrorHook>) -> Result<Vec<Box<dyn LogSink>>, ConfigError> {
        let mut sinks: Vec<Box<dyn LogSink>> = Vec::new();

        if let Some(slack) = &self.slack {
            let formatter = self.formatter("slack", slack.format.as_deref())?;
            let client = SlackClient::with_timeout(
                slack.token.clone(),
                Duration::from_secs(slack.timeout_seconds),
            )?
            .with_base_url(slack.base_url.clone());
            info!(channel = %slack.channel, min_level = %slack.min_level, "Slack sink enabled.");
            sinks.push(Box::new(
                ChatSink::slack(client, slack.channel.clone())
                    .with_formatter(Box::new(formatter))
                    .with_min_level(slack.min_level)
                    .with_error_hook(error_hook.clone()),
            ));
        }

        if let Some(sms) = &self.sms {
            let formatter = self.formatter("sms", sms.format.as_deref())?;
            let client = TwilioClient::with_timeout(
                sms.account_sid.clone(),
                sms.auth_token.clone(),
                Duration::from_secs(sms.timeout_seconds),
            )?
            .with_base_url(sms.base_url.clone());
            if sms.recipients.is_empty() {
                tracing::warn!("SMS sink is configured without recipients; nothing will be sent.");
            }
            info!(recipients = sms.recipients.len(), "SMS sink enabled.");
            sinks.push(Box::new(
                SmsSink::twilio(client, sms.sender.clone(), sms.recipients.clone())
                    .with_formatter(Box::new(formatter))
                    .with_error_hook(error_hook),
            ));
        }

        Ok(sinks)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            slack: None,
            sms: None,
        }
    }
}
