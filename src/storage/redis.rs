//! Redis session storage
//!
//! Each user session is a Redis hash stored at `{prefix}{user_id}`. Writes of
//! several fields go out as one `HSET`, so they are applied atomically.

use redis::AsyncCommands;
use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::{Data, Storage};

/// Redis-based session storage
#[derive(Clone)]
pub struct RedisStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisStorage {
    /// Connect to the configured Redis instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Test Redis connection
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Get the Redis key for a user's session
    fn session_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn set_fields(&self, key: &str, values: &Data) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let key = self.session_key(key);
        let items: Vec<(&String, &String)> = values.iter().collect();
        let mut conn = self.connection_manager.clone();

        let result: redis::RedisResult<()> = if self.config.ttl_seconds > 0 {
            redis::pipe()
                .atomic()
                .hset_multiple(&key, &items)
                .ignore()
                .expire(&key, self.config.ttl_seconds as i64)
                .ignore()
                .query_async(&mut conn)
                .await
        } else {
            conn.hset_multiple(&key, &items).await
        };

        match result {
            Ok(()) => {
                debug!(key = %key, fields = items.len(), ttl_seconds = self.config.ttl_seconds, "Fields written to Redis");
                Ok(())
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to write fields to Redis");
                Err(e.into())
            }
        }
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        let key = self.session_key(key);
        let mut conn = self.connection_manager.clone();

        let value: Option<String> = conn.hget(&key, field).await?;
        Ok(value)
    }

    async fn get_all_fields(&self, key: &str) -> Result<Data> {
        let key = self.session_key(key);
        let mut conn = self.connection_manager.clone();

        let values: Data = conn.hgetall(&key).await?;
        debug!(key = %key, fields = values.len(), "Session loaded from Redis");
        Ok(values)
    }

    async fn delete_fields(&self, key: &str, fields: &[&str]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let key = self.session_key(key);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.hdel(&key, fields).await?;
        debug!(key = %key, deleted = deleted, "Fields deleted from Redis");
        Ok(())
    }

    async fn clear_all(&self, key: &str) -> Result<()> {
        let key = self.session_key(key);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(key = %key, deleted = deleted > 0, "Session deleted from Redis");
        Ok(())
    }
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
