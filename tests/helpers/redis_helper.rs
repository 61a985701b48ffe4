//! Redis test instance
//!
//! Uses `TEST_REDIS_URL` when set, otherwise starts a Redis container.

use botstate::config::RedisConfig;
use botstate::RedisStorage;
use testcontainers_modules::redis::Redis;
use testcontainers::{runners::AsyncRunner, ContainerAsync};

/// Redis-backed storage kept alive together with its container
pub struct TestRedis {
    pub storage: RedisStorage,
    pub config: RedisConfig,
    _container: Option<ContainerAsync<Redis>>,
}

impl TestRedis {
    pub async fn new(prefix: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        super::init_tracing();

        let (url, container) = if let Ok(url) = std::env::var("TEST_REDIS_URL") {
            (url, None)
        } else {
            let container = Redis::default().start().await?;
            let port = container.get_host_port_ipv4(6379).await?;
            (format!("redis://127.0.0.1:{}", port), Some(container))
        };

        let config = RedisConfig {
            url,
            prefix: prefix.to_string(),
            ttl_seconds: 300,
        };
        let storage = RedisStorage::new(config.clone()).await?;

        Ok(Self {
            storage,
            config,
            _container: container,
        })
    }

    /// Remaining time to live of a user hash, as reported by `TTL`
    pub async fn ttl(&self, user_id: &str) -> redis::RedisResult<i64> {
        let client = redis::Client::open(self.config.url.as_str())?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("TTL")
            .arg(format!("{}{}", self.config.prefix, user_id))
            .query_async(&mut conn)
            .await
    }
}
