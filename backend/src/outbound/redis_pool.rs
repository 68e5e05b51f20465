//! Shared `bb8-redis` pool for the read cache and the event stream.

use std::time::Duration;

use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};

/// Errors raised while building or using the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedisPoolError {
    /// The connection URL was rejected.
    #[error("invalid redis configuration: {message}")]
    Config { message: String },
    /// No connection became available in time.
    #[error("failed to get redis connection: {message}")]
    Checkout { message: String },
}

/// Lazily connecting Redis pool. Cloning shares the underlying pool.
///
/// Construction never dials the server, so the service starts while Redis
/// is down and recovers once it comes back.
#[derive(Clone)]
pub struct RedisPool {
    inner: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Build a pool for `url` with at most `max_size` connections.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Config`] when `url` is not a Redis URL.
    pub fn new(url: &str, max_size: u32) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(url).map_err(|err| RedisPoolError::Config {
            message: err.to_string(),
        })?;
        let inner = Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_secs(2))
            .build_unchecked(manager);
        Ok(Self { inner })
    }

    /// Check out a connection.
    pub async fn get(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, RedisPoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| RedisPoolError::Checkout {
                message: err.to_string(),
            })
    }
}
