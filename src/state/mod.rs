//! State management module
//!
//! This module holds the state registry, the per-user session store, the
//! outbound message buffer and the engine that ties them together.

pub mod bot;
pub mod messages;
pub mod registry;
pub mod session;

// Re-export commonly used state components
pub use bot::{Bot, DEFAULT_MAX_DEPTH};
pub use messages::MessageBuffer;
pub use registry::{Handler, HandlerFuture, State, StateRegistry};
pub use session::{Session, SessionSummary};
