//! Port abstraction for the user snapshot read cache.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{User, UserId};

/// Errors raised by cache adapters. Callers log and discard them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserCacheError {
    /// The cache backend failed or was unreachable.
    #[error("user cache backend failed: {message}")]
    Backend {
        /// Adapter-level detail.
        message: String,
    },
    /// An entry could not be encoded or decoded.
    #[error("user cache entry could not be (de)serialized: {message}")]
    Serialization {
        /// Adapter-level detail.
        message: String,
    },
    /// The operation exceeded its deadline.
    #[error("user cache operation timed out")]
    Timeout,
}

impl UserCacheError {
    /// Build a [`UserCacheError::Backend`].
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Build a [`UserCacheError::Serialization`].
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Namespaced key for a cached user snapshot.
///
/// The `v1` segment is bumped whenever the [`User`] wire form changes so old
/// entries are ignored rather than misread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserCacheKey(String);

impl UserCacheKey {
    /// Key prefix shared by every entry.
    pub const PREFIX: &'static str = "user:v1:";

    /// Build the key for `id`.
    pub fn for_user(id: &UserId) -> Self {
        Self(format!("{}{id}", Self::PREFIX))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposable projection of active users keyed by identifier.
///
/// Never authoritative: a miss or an error only causes a fallback read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Look up a snapshot.
    async fn get(&self, id: &UserId) -> Result<Option<User>, UserCacheError>;

    /// Store or overwrite a snapshot with the adapter's TTL.
    async fn put(&self, user: &User) -> Result<(), UserCacheError>;

    /// Remove a snapshot if present.
    async fn evict(&self, id: &UserId) -> Result<(), UserCacheError>;
}

/// Cache that stores nothing, used when no cache backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserCache;

#[async_trait]
impl UserCache for NoOpUserCache {
    async fn get(&self, _id: &UserId) -> Result<Option<User>, UserCacheError> {
        Ok(None)
    }

    async fn put(&self, _user: &User) -> Result<(), UserCacheError> {
        Ok(())
    }

    async fn evict(&self, _id: &UserId) -> Result<(), UserCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn key_is_namespaced_by_version() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        assert_eq!(
            UserCacheKey::for_user(&id).as_str(),
            "user:v1:3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoOpUserCache;
        let id = UserId::random();
        cache.evict(&id).await.expect("evict");
        assert_eq!(cache.get(&id).await.expect("get"), None);
    }
}
