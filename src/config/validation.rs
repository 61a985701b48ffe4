//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BotStateError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.storage.backend == StorageBackend::Redis {
        validate_redis_config(&settings.redis)?;
    }
    validate_engine_config(&settings.engine)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BotStateError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
        return Err(BotStateError::Config(
            format!("Redis URL must use the redis:// or rediss:// scheme: {}", config.url)
        ));
    }

    Ok(())
}

/// Validate engine configuration
fn validate_engine_config(config: &super::EngineConfig) -> Result<()> {
    if config.max_depth == 0 {
        return Err(BotStateError::Config(
            "Engine max depth must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotStateError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BotStateError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(BotStateError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_zero_depth_rejected() {
        let mut settings = Settings::default();
        settings.engine.max_depth = 0;
        assert_matches!(validate_settings(&settings), Err(BotStateError::Config(_)));
    }

    #[test]
    fn test_redis_url_checked_only_for_redis_backend() {
        let mut settings = Settings::default();
        settings.redis.url = "localhost:6379".to_string();
        assert!(validate_settings(&settings).is_ok());

        settings.storage.backend = StorageBackend::Redis;
        assert_matches!(validate_settings(&settings), Err(BotStateError::Config(_)));
    }

    #[test]
    fn test_invalid_logging() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());

        settings.logging.level = "debug".to_string();
        settings.logging.format = "xml".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
