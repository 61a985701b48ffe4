//! Outbound message buffer

use crate::utils::errors::{BotStateError, Result};

/// Ordered queue of outbound text produced while executing states.
///
/// Lives as long as the [`Bot`](super::Bot) that owns it and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct MessageBuffer {
    messages: Vec<String>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all messages in order. An empty list is rejected and nothing is appended.
    pub fn add_messages<I, S>(&mut self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<String> = messages.into_iter().map(Into::into).collect();
        if messages.is_empty() {
            return Err(BotStateError::EmptyInput);
        }

        self.messages.extend(messages);
        Ok(())
    }

    /// Accumulated messages, the queue is left as is
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Drain the queue
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
