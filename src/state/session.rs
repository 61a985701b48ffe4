//! Per-user session store
//!
//! Wraps a [`Storage`] backend for a single user id and keeps a cached
//! snapshot of every field, refreshed after each write.

use std::sync::Arc;
use serde::Serialize;
use tracing::debug;

use crate::storage::{Data, Storage, CURRENT_STATE, STATE_WITH_CALLBACK, USER_ID};
use crate::utils::errors::{BotStateError, Result};
use crate::utils::logging;

/// Persisted field set for one user
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
    user_id: Option<String>,
    /// Snapshot of all fields as of the last read or write
    current: Data,
}

impl Session {
    /// Create an unbound session on top of the given backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            user_id: None,
            current: Data::new(),
        }
    }

    /// Bind the session to `user_id`, persist the `user_id` field and load
    /// everything already stored for that user.
    pub async fn initialize(&mut self, user_id: impl ToString) -> Result<()> {
        let user_id = user_id.to_string();
        if user_id.is_empty() {
            return Err(BotStateError::EmptyUserId);
        }

        self.user_id = Some(user_id.clone());

        // the field is written once, an existing value is kept
        let existing = self.storage.get_field(&user_id, USER_ID).await?;
        if existing.is_none() {
            self.storage
                .set_fields(&user_id, &Data::from([(USER_ID.to_string(), user_id.clone())]))
                .await?;
        }

        self.refresh().await?;
        debug!(user_id = %user_id, fields = self.current.len(), "Session initialized");
        Ok(())
    }

    /// Bound user id, `None` until [`initialize`](Self::initialize) succeeds
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.user_id.as_deref().map_or(false, |id| !id.is_empty())
    }

    /// Write all fields, then refresh the snapshot.
    ///
    /// The fields go to the backend in a single call; whether that call is
    /// atomic depends on the backend. No rollback happens on failure.
    pub async fn set_fields(&mut self, values: Data) -> Result<()> {
        let user_id = self.bound_user_id()?.to_string();
        let mut values = values;
        // user_id is never overwritten
        values.remove(USER_ID);
        if values.is_empty() {
            return Ok(());
        }

        self.storage.set_fields(&user_id, &values).await?;
        self.refresh().await
    }

    /// Write a single field
    pub async fn set_field(&mut self, field: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.set_fields(Data::from([(field.into(), value.into())])).await
    }

    /// Read one field from the backend
    pub async fn get_field(&self, field: &str) -> Result<Option<String>> {
        let user_id = self.bound_user_id()?;
        self.storage.get_field(user_id, field).await
    }

    /// Read every field from the backend and refresh the snapshot
    pub async fn get_all_fields(&mut self) -> Result<Data> {
        self.refresh().await?;
        Ok(self.current.clone())
    }

    /// Cached snapshot of all fields
    pub fn current(&self) -> &Data {
        &self.current
    }

    /// One value of the cached snapshot
    pub fn current_value(&self, field: &str) -> Option<&str> {
        self.current.get(field).map(String::as_str)
    }

    pub async fn set_current_state(&mut self, name: &str) -> Result<()> {
        self.set_field(CURRENT_STATE, name).await
    }

    pub async fn current_state(&self) -> Result<Option<String>> {
        self.get_field(CURRENT_STATE).await
    }

    pub async fn set_state_with_callback(&mut self, name: &str) -> Result<()> {
        self.set_field(STATE_WITH_CALLBACK, name).await
    }

    pub async fn state_with_callback(&self) -> Result<Option<String>> {
        self.get_field(STATE_WITH_CALLBACK).await
    }

    /// Drop the pending validation callback without touching `current_state`
    pub async fn clear_state_with_callback(&mut self) -> Result<()> {
        let user_id = self.bound_user_id()?.to_string();
        self.storage.delete_fields(&user_id, &[STATE_WITH_CALLBACK]).await?;
        self.refresh().await
    }

    /// Clear `current_state` and `state_with_callback`, keeping every other field
    pub async fn clear_control_fields(&mut self) -> Result<()> {
        let user_id = self.bound_user_id()?.to_string();
        self.storage.clear_control_fields(&user_id).await?;
        logging::log_session_reset(&user_id, false);
        self.refresh().await
    }

    /// Clear every field of this user, `user_id` included.
    ///
    /// The session is unbound afterwards and has to be initialized again.
    pub async fn clear_all(&mut self) -> Result<()> {
        let user_id = self.bound_user_id()?.to_string();
        self.storage.clear_all(&user_id).await?;
        logging::log_session_reset(&user_id, true);
        self.user_id = None;
        self.current.clear();
        Ok(())
    }

    /// Summary of the session for logging and debugging
    pub fn summary(&self) -> SessionSummary {
        let mut data_keys: Vec<String> = self
            .current
            .keys()
            .filter(|key| ![USER_ID, CURRENT_STATE, STATE_WITH_CALLBACK].contains(&key.as_str()))
            .cloned()
            .collect();
        data_keys.sort();

        SessionSummary {
            user_id: self.user_id.clone(),
            current_state: self.current.get(CURRENT_STATE).cloned(),
            state_with_callback: self.current.get(STATE_WITH_CALLBACK).cloned(),
            data_keys,
        }
    }

    fn bound_user_id(&self) -> Result<&str> {
        match self.user_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(BotStateError::Uninitialized { state: String::new() }),
        }
    }

    async fn refresh(&mut self) -> Result<()> {
        let user_id = self.bound_user_id()?.to_string();
        self.current = self.storage.get_all_fields(&user_id).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Session summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub user_id: Option<String>,
    pub current_state: Option<String>,
    pub state_with_callback: Option<String>,
    pub data_keys: Vec<String>,
}
