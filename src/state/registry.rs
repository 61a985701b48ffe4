//! State definitions and the ordered state registry

use std::sync::Arc;
use futures::future::BoxFuture;

use crate::utils::errors::Result;
use super::bot::Bot;

/// Future returned by a state handler
pub type HandlerFuture<'a> = BoxFuture<'a, Result<bool>>;

/// Run or validation handler attached to a state.
///
/// Handlers get the engine mutably, so they can read and write session fields,
/// queue outbound messages or jump to another state with
/// [`Bot::execute_state`].
pub type Handler = Arc<dyn for<'a> Fn(&'a mut Bot) -> HandlerFuture<'a> + Send + Sync>;

/// A named unit of flow logic
#[derive(Clone)]
pub struct State {
    name: String,
    run: Option<Handler>,
    callback: Option<Handler>,
    next: Option<String>,
}

impl State {
    /// Create a state with no handlers and no next state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: None,
            callback: None,
            next: None,
        }
    }

    /// Handler executed when the state runs. Returning `true` advances to the next state.
    pub fn with_run<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Bot) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(handler));
        self
    }

    /// Validation callback, resolved at the start of the following `execute_state` call
    pub fn with_callback<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Bot) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(handler));
        self
    }

    /// State the user moves to after a successful run
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        let next = next.into();
        self.next = if next.is_empty() { None } else { Some(next) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn run_handler(&self) -> Option<&Handler> {
        self.run.as_ref()
    }

    pub fn callback_handler(&self) -> Option<&Handler> {
        self.callback.as_ref()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("run", &self.run.is_some())
            .field("callback", &self.callback.is_some())
            .field("next", &self.next)
            .finish()
    }
}

/// Fixed, ordered sequence of states.
///
/// Names are expected to be unique. Lookups return the first match, duplicates
/// are not detected.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    states: Vec<State>,
}

impl StateRegistry {
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    /// Find a state by exact name
    pub fn get(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|state| state.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl From<Vec<State>> for StateRegistry {
    fn from(states: Vec<State>) -> Self {
        Self::new(states)
    }
}
