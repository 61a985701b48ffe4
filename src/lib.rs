//! botstate
//!
//! Drives a conversational bot through a sequence of named states and keeps
//! each user's progress in a persisted session between incoming messages.
//! States carry caller-supplied async handlers; an optional validation callback
//! on a state is resolved at the start of the following engine call.

pub mod config;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotStateError, Result};

// Re-export main components for easy access
pub use state::{Bot, MessageBuffer, Session, State, StateRegistry};
pub use storage::{Data, MemoryStorage, RedisStorage, Storage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
