//! Session persistence backends
//!
//! A backend stores one hash of string fields per user key. The engine and the
//! session store only talk to it through the [`Storage`] trait, so any store
//! with per-key hash semantics can be plugged in.

pub mod memory;
pub mod redis;

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::info;

use crate::config::{Settings, StorageBackend};
use crate::utils::errors::Result;

pub use memory::MemoryStorage;
pub use self::redis::RedisStorage;

/// All fields of one user's session
pub type Data = HashMap<String, String>;

/// Field holding the bound user id
pub const USER_ID: &str = "user_id";
/// Field holding the state the user is positioned at
pub const CURRENT_STATE: &str = "current_state";
/// Field holding the state whose validation callback is pending
pub const STATE_WITH_CALLBACK: &str = "state_with_callback";
/// Fields managed by the engine
pub const CONTROL_FIELDS: [&str; 2] = [CURRENT_STATE, STATE_WITH_CALLBACK];

/// Persistence contract for per-user session hashes.
///
/// Implementations are not required to write the fields of one `set_fields`
/// call atomically. When a write fails halfway, the fields already written
/// stay committed and the error is returned unchanged.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write every field of `values` into the hash stored at `key`
    async fn set_fields(&self, key: &str, values: &Data) -> Result<()>;

    /// Read one field, `None` when the key or field does not exist
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Read the whole hash, empty when the key does not exist
    async fn get_all_fields(&self, key: &str) -> Result<Data>;

    /// Remove the given fields from the hash, missing fields are ignored
    async fn delete_fields(&self, key: &str, fields: &[&str]) -> Result<()>;

    /// Remove every field stored at `key`. Other keys are left untouched.
    async fn clear_all(&self, key: &str) -> Result<()>;

    /// Remove only `current_state` and `state_with_callback`
    async fn clear_control_fields(&self, key: &str) -> Result<()> {
        self.delete_fields(key, &CONTROL_FIELDS).await
    }
}

/// Build the backend selected in the settings
pub async fn from_settings(settings: &Settings) -> Result<Arc<dyn Storage>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory session storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Redis => {
            info!(url = %settings.redis.url, prefix = %settings.redis.prefix, "Using Redis session storage");
            let storage = RedisStorage::new(settings.redis.clone()).await?;
            Ok(Arc::new(storage))
        }
    }
}
