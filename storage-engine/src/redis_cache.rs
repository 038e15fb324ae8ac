//! Redis adapter for the key-value cache port.

use async_trait::async_trait;
use bootcamp::ports::KeyValueCache;
use deadpool_redis::redis::{self, AsyncCommands, RedisError};
use deadpool_redis::{Connection, Pool, PoolConfig, Runtime, Timeouts};
use shared::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis-backed cache. Connections come from a deadpool pool that is created
/// eagerly but only dials Redis on first use.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds the pool for `url`. No connection is attempted here.
    pub fn connect_lazy(url: &str, timeout: Duration) -> Result<Self> {
        info!(url = %url, "Creating Redis pool");

        let mut config = deadpool_redis::Config::from_url(url);
        config.pool = Some(PoolConfig {
            timeouts: Timeouts {
                wait: Some(timeout),
                create: Some(timeout),
                recycle: Some(timeout),
            },
            ..PoolConfig::default()
        });

        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::Internal(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool.get().await.map_err(|e| {
            warn!(error = %e, "Failed to get Redis connection");
            Error::UpstreamUnavailable(format!("redis connection: {}", e))
        })
    }
}

fn command_error(command: &str, key: &str, e: RedisError) -> Error {
    warn!(command = %command, key = %key, error = %e, "Redis command failed");
    Error::UpstreamUnavailable(format!("redis {}: {}", command, e))
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn ping(&self) -> Result<String> {
        let mut conn = self.connection().await?;
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| command_error("PING", "", e))?;
        Ok(reply)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| command_error("GET", key, e))?;
        debug!(key = %key, hit = value.is_some(), "redis GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| command_error("SET", key, e))
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .hget(key, field)
            .await
            .map_err(|e| command_error("HGET", key, e))?;
        debug!(key = %key, field = %field, hit = value.is_some(), "redis HGET");
        Ok(value)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(|e| command_error("HSET", key, e))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        // EXPIRE has whole-second resolution
        let seconds = ttl.as_secs().max(1) as i64;
        let mut conn = self.connection().await?;
        conn.expire::<_, bool>(key, seconds)
            .await
            .map_err(|e| command_error("EXPIRE", key, e))
    }
}
