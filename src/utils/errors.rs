//! Error handling for botstate
//!
//! This module defines the main error type returned by the engine, the session
//! store and the storage backends.

use thiserror::Error;

/// Main error type for botstate operations
#[derive(Error, Debug)]
pub enum BotStateError {
    #[error("No state to execute with name {name}.")]
    UnknownState { name: String },

    #[error("Undefined user to execute state {state}.")]
    Uninitialized { state: String },

    #[error("Method to execute in the {state} state is not defined.")]
    MissingHandler { state: String },

    #[error("undefined messages")]
    EmptyInput,

    #[error("User id must not be empty.")]
    EmptyUserId,

    #[error("Maximum re-entry depth of {limit} reached while executing state {state}.")]
    DepthExceeded { state: String, limit: usize },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),
}

/// Result type alias for botstate operations
pub type Result<T> = std::result::Result<T, BotStateError>;

impl BotStateError {
    /// Check if retrying the same call may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotStateError::UnknownState { .. } => false,
            BotStateError::Uninitialized { .. } => false,
            BotStateError::MissingHandler { .. } => false,
            BotStateError::EmptyInput => false,
            BotStateError::EmptyUserId => false,
            BotStateError::DepthExceeded { .. } => false,
            BotStateError::Redis(_) => true,
            BotStateError::Storage(_) => true,
            BotStateError::Config(_) => false,
            BotStateError::ConfigLoad(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotStateError::Config(_) | BotStateError::ConfigLoad(_) => ErrorSeverity::Critical,
            BotStateError::DepthExceeded { .. } => ErrorSeverity::Warning,
            BotStateError::EmptyInput | BotStateError::EmptyUserId => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BotStateError::UnknownState { name: "add_product".to_string() };
        assert_eq!(err.to_string(), "No state to execute with name add_product.");

        let err = BotStateError::Uninitialized { state: "add_product".to_string() };
        assert_eq!(err.to_string(), "Undefined user to execute state add_product.");

        assert_eq!(BotStateError::EmptyInput.to_string(), "undefined messages");
        assert_eq!(BotStateError::EmptyUserId.to_string(), "User id must not be empty.");
    }

    #[test]
    fn test_error_classification() {
        assert!(!BotStateError::EmptyInput.is_recoverable());
        assert!(BotStateError::Storage("connection reset".to_string()).is_recoverable());
        assert_eq!(BotStateError::Config("bad".to_string()).severity(), ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
