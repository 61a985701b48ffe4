//! Test helpers module
//!
//! Shared setup for the integration tests: engine construction on top of the
//! in-memory backend, reusable handlers and a Redis test instance.

#![allow(dead_code)]

pub mod redis_helper;
pub mod test_context;

pub use redis_helper::*;
pub use test_context::*;
