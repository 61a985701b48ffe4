//! In-memory session storage
//!
//! Keeps every user hash in a process-local map. Used by tests and by the
//! console driver when no Redis instance is configured.

use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::utils::errors::Result;
use super::{Data, Storage};

/// Process-local hash store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    hashes: RwLock<HashMap<String, Data>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of user hashes currently held, for inspection only
    pub async fn key_count(&self) -> usize {
        self.hashes.read().await.len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn set_fields(&self, key: &str, values: &Data) -> Result<()> {
        let mut hashes = self.hashes.write().await;
        let hash = hashes.entry(key.to_string()).or_default();
        for (field, value) in values {
            hash.insert(field.clone(), value.clone());
        }
        debug!(key = key, fields = values.len(), "Fields written to memory storage");
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    async fn get_all_fields(&self, key: &str) -> Result<Data> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(key).cloned().unwrap_or_default())
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> Result<()> {
        let mut hashes = self.hashes.write().await;
        if let Some(hash) = hashes.get_mut(key) {
            for field in fields {
                hash.remove(*field);
            }
            // an empty hash does not exist, same as in Redis
            if hash.is_empty() {
                hashes.remove(key);
            }
        }
        Ok(())
    }

    async fn clear_all(&self, key: &str) -> Result<()> {
        self.hashes.write().await.remove(key);
        debug!(key = key, "Key removed from memory storage");
        Ok(())
    }
}
