//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for state execution and session management.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{BotStateError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let json = config.format == "json";

    let stdout_layer = if json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "botstate.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = if json {
                tracing_subscriber::fmt::layer().json().with_writer(non_blocking).boxed()
            } else {
                tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking).boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotStateError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a state transition after a successful run
pub fn log_state_transition(user_id: &str, from: &str, to: &str) {
    info!(
        user_id = user_id,
        from = from,
        to = to,
        "State transition"
    );
}

/// Log the outcome of a deferred validation callback
pub fn log_callback_result(user_id: &str, callback_state: &str, passed: bool) {
    if passed {
        debug!(user_id = user_id, callback_state = callback_state, "Validation callback passed");
    } else {
        info!(
            user_id = user_id,
            callback_state = callback_state,
            "Validation callback not satisfied, state run skipped"
        );
    }
}

/// Log a session reset
pub fn log_session_reset(user_id: &str, full: bool) {
    if full {
        warn!(user_id = user_id, "All session fields cleared");
    } else {
        info!(user_id = user_id, "Session control fields cleared");
    }
}
