//! Execution engine
//!
//! [`Bot`] owns the state registry, the user's session and the outbound
//! message buffer. [`Bot::execute_state`] positions the user at a state,
//! resolves the validation callback armed by the previous call, runs the state
//! and advances to its next state.
//!
//! Validation is deferred by one call: a state with a callback runs right away
//! and records itself in `state_with_callback`. The next `execute_state` call,
//! whatever state it targets, first runs that callback and only proceeds when
//! it returns `true`. A `false` result is not an error; the caller retries the
//! same state once the condition the callback checks may have changed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::storage::{self, Storage};
use crate::utils::errors::{BotStateError, Result};
use crate::utils::logging;
use super::messages::MessageBuffer;
use super::registry::{State, StateRegistry};
use super::session::Session;

/// Default limit of nested `execute_state` calls
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// State-transition engine bound to one user session
pub struct Bot {
    registry: Arc<StateRegistry>,
    session: Session,
    messages: MessageBuffer,
    max_depth: usize,
    depth: Arc<AtomicUsize>,
}

/// Holds one level of re-entry depth, released on drop so a cancelled call
/// gives its level back
struct DepthGuard(Arc<AtomicUsize>);

impl DepthGuard {
    fn enter(depth: &Arc<AtomicUsize>) -> Self {
        depth.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(depth))
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Bot {
    /// Create an engine with an unbound session on top of `storage`
    pub fn new(states: impl Into<StateRegistry>, storage: Arc<dyn Storage>) -> Self {
        Self {
            registry: Arc::new(states.into()),
            session: Session::new(storage),
            messages: MessageBuffer::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an engine using the backend and limits from the settings
    pub async fn from_settings(settings: &Settings, states: impl Into<StateRegistry>) -> Result<Self> {
        let storage = storage::from_settings(settings).await?;
        Ok(Self::new(states, storage).with_max_depth(settings.engine.max_depth))
    }

    /// Limit how deeply handlers may re-enter [`execute_state`](Self::execute_state)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn states(&self) -> &[State] {
        self.registry.states()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Bind the session to a user, see [`Session::initialize`]
    pub async fn user(&mut self, user_id: impl ToString) -> Result<()> {
        self.session.initialize(user_id).await
    }

    /// Queue outbound messages, see [`MessageBuffer::add_messages`]
    pub fn add_messages<I, S>(&mut self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.add_messages(messages)
    }

    /// Messages queued so far
    pub fn messages(&self) -> &[String] {
        self.messages.messages()
    }

    /// Drain the queued messages
    pub fn take_messages(&mut self) -> Vec<String> {
        self.messages.take()
    }

    /// Execute the state called `name` for the bound user.
    ///
    /// Returns the result of the state's run handler, or `Ok(false)` without
    /// running it when the pending validation callback is not satisfied yet.
    /// Handlers may call this again to jump to another state; nesting deeper
    /// than the configured limit fails with [`BotStateError::DepthExceeded`].
    pub fn execute_state<'a>(&'a mut self, name: &str) -> BoxFuture<'a, Result<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            if self.depth.load(Ordering::SeqCst) >= self.max_depth {
                warn!(state = %name, limit = self.max_depth, "Re-entry depth exceeded");
                return Err(BotStateError::DepthExceeded {
                    state: name,
                    limit: self.max_depth,
                });
            }

            let _guard = DepthGuard::enter(&self.depth);
            self.run_state(&name).await
        })
    }

    async fn run_state(&mut self, name: &str) -> Result<bool> {
        let registry = Arc::clone(&self.registry);

        let state = registry
            .get(name)
            .ok_or_else(|| BotStateError::UnknownState { name: name.to_string() })?;

        if !self.session.is_initialized() {
            return Err(BotStateError::Uninitialized { state: name.to_string() });
        }

        let run = state
            .run_handler()
            .ok_or_else(|| BotStateError::MissingHandler { state: name.to_string() })?;

        let user_id = self.session.user_id().unwrap_or_default().to_string();
        debug!(user_id = %user_id, state = %name, depth = self.depth.load(Ordering::SeqCst), "Executing state");

        self.session.set_current_state(name).await?;

        if !self.resolve_callback(&registry, &user_id).await? {
            return Ok(false);
        }

        if state.has_callback() {
            self.session.set_state_with_callback(name).await?;
            debug!(user_id = %user_id, state = %name, "Validation callback armed");
        }

        let executed = run(&mut *self).await?;

        if executed {
            if let Some(next) = state.next() {
                self.session.set_current_state(next).await?;
                logging::log_state_transition(&user_id, name, next);
            }
        }

        info!(user_id = %user_id, state = %name, executed = executed, "State executed");
        Ok(executed)
    }

    /// Run the callback armed by the previous call, if any.
    ///
    /// A pending state that no longer exists or has no callback counts as passed.
    /// The pending entry is cleared once the callback passes.
    async fn resolve_callback(&mut self, registry: &StateRegistry, user_id: &str) -> Result<bool> {
        let pending = match self.session.state_with_callback().await? {
            Some(pending) if !pending.is_empty() => pending,
            _ => return Ok(true),
        };

        let passed = match registry.get(&pending).and_then(State::callback_handler) {
            Some(callback) => callback(&mut *self).await?,
            None => true,
        };

        logging::log_callback_result(user_id, &pending, passed);

        // the callback may have re-entered the engine and armed another state
        if passed && self.session.state_with_callback().await?.as_deref() == Some(pending.as_str()) {
            self.session.clear_state_with_callback().await?;
        }

        Ok(passed)
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("states", &self.registry.len())
            .field("session", &self.session)
            .field("messages", &self.messages)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
