//! Redis-backed `UserCache` adapter.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis;
use rand::Rng;
use tracing::debug;

use crate::domain::ports::{UserCache, UserCacheError, UserCacheKey};
use crate::domain::{User, UserId};
use crate::outbound::redis_pool::{RedisPool, RedisPoolError};

/// The random TTL extension is at most `base / TTL_JITTER_DIVISOR`.
const TTL_JITTER_DIVISOR: u64 = 10;

/// Base TTL extended by a random amount of up to 10%, in whole seconds.
///
/// Never returns zero, since `SET .. EX 0` is rejected by Redis.
pub fn jittered_ttl_secs<R: Rng>(base: Duration, rng: &mut R) -> u64 {
    let base_secs = base.as_secs().max(1);
    let max_jitter = base_secs / TTL_JITTER_DIVISOR;
    base_secs.saturating_add(rng.gen_range(0..=max_jitter))
}

/// User snapshot cache stored in Redis as JSON strings.
#[derive(Clone)]
pub struct RedisUserCache {
    pool: RedisPool,
    ttl: Duration,
}

impl RedisUserCache {
    /// Create a cache whose entries live for roughly `ttl`.
    pub fn new(pool: RedisPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }
}

fn map_pool_error(error: RedisPoolError) -> UserCacheError {
    UserCacheError::backend(error.to_string())
}

fn map_redis_error(error: redis::RedisError) -> UserCacheError {
    UserCacheError::backend(error.to_string())
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, id: &UserId) -> Result<Option<User>, UserCacheError> {
        let key = UserCacheKey::for_user(id);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| UserCacheError::serialization(err.to_string()))
    }

    async fn put(&self, user: &User) -> Result<(), UserCacheError> {
        let key = UserCacheKey::for_user(&user.id);
        let json = serde_json::to_string(user)
            .map_err(|err| UserCacheError::serialization(err.to_string()))?;
        let ttl = jittered_ttl_secs(self.ttl, &mut rand::thread_rng());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("SET")
            .arg(key.as_str())
            .arg(json)
            .arg("EX")
            .arg(ttl)
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(%key, ttl, "user snapshot cached");
        Ok(())
    }

    async fn evict(&self, id: &UserId) -> Result<(), UserCacheError> {
        let key = UserCacheKey::for_user(id);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        redis::cmd("DEL")
            .arg(key.as_str())
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case::hour(3600, 3600, 3960)]
    #[case::short(5, 5, 5)]
    #[case::zero(0, 1, 1)]
    fn ttl_stays_within_jitter_window(#[case] base: u64, #[case] min: u64, #[case] max: u64) {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let ttl = jittered_ttl_secs(Duration::from_secs(base), &mut rng);
            assert!((min..=max).contains(&ttl), "{ttl} outside {min}..={max}");
        }
    }

    #[rstest]
    fn ttl_actually_varies() {
        let mut rng = SmallRng::seed_from_u64(7);
        let samples: std::collections::HashSet<u64> = (0..50)
            .map(|_| jittered_ttl_secs(Duration::from_secs(3600), &mut rng))
            .collect();
        assert!(samples.len() > 1);
    }

    #[tokio::test]
    async fn unreachable_backend_reports_backend_error() {
        let pool = RedisPool::new("redis://127.0.0.1:1/", 1).expect("pool");
        let cache = RedisUserCache::new(pool, Duration::from_secs(60));
        let error = cache.get(&UserId::random()).await.expect_err("no server");
        assert!(matches!(error, UserCacheError::Backend { .. }));
    }
}
