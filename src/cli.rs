//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. The record to send comes from the arguments; settings such as
//! `--log-level` are merged over the configuration file and environment.

use crate::core::Level;
use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Sends a log record to every configured notification sink.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Filter for this program's own diagnostics (e.g. "debug").
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Timestamp layout for the `{timestamp}` placeholder.
    #[arg(long, value_name = "STRFTIME")]
    pub time_format: Option<String>,

    /// Severity of the record to send.
    #[arg(short, long, default_value = "INFO")]
    pub level: Level,

    /// Logger name shown in the message.
    #[arg(long, default_value = "log-dispatch")]
    pub logger: String,

    /// Emoji that replaces the level icon in chat messages.
    #[arg(long, value_name = "EMOJI")]
    pub icon: Option<String>,

    /// The message text.
    pub message: String,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(format) = &self.time_format {
            dict.insert("time_format".into(), Value::from(format.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
