//! log-dispatch - sends one log record through every configured sink
//!
//! Useful for checking credentials and message layout before wiring the
//! sinks into an application's logger.

use anyhow::{Context, Result};
use clap::Parser;
use log_dispatch::{cli::Cli, config::Config, LogRecord, TracingHook};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).context("Failed to load configuration")?;

    // Initialize logging; RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Time Format: {}", config.time_format);
    info!(
        "Slack Sink: {}",
        config
            .slack
            .as_ref()
            .map_or("Disabled".to_string(), |s| format!("{} (min {})", s.channel, s.min_level))
    );
    info!(
        "SMS Sink: {}",
        config
            .sms
            .as_ref()
            .map_or("Disabled".to_string(), |s| format!("{} recipient(s)", s.recipients.len()))
    );
    info!("-------------------------------------------------------");

    let sinks = config.build_sinks(Arc::new(TracingHook))?;
    if sinks.is_empty() {
        warn!("No sinks are configured; nothing to send.");
        return Ok(());
    }

    let mut record = LogRecord::new(cli.level, cli.logger.clone(), cli.message.clone());
    if let Some(icon) = &cli.icon {
        record = record.with_slack_icon(icon.clone());
    }

    for sink in &sinks {
        info!(sink = sink.name(), "Dispatching record.");
        sink.handle(&record);
    }

    Ok(())
}
