//! Process-local user snapshot cache used by coordinator tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserCache, UserCacheError};
use crate::domain::{User, UserId};

/// Unbounded map of snapshots without expiry.
///
/// Entries only leave through [`UserCache::evict`] or an overwrite.
#[derive(Debug, Default)]
pub struct InMemoryUserCache {
    entries: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when a snapshot for `id` is held.
    pub fn contains(&self, id: &UserId) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(id))
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, id: &UserId) -> Result<Option<User>, UserCacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| UserCacheError::backend("cache lock poisoned"))?;
        Ok(entries.get(id).cloned())
    }

    async fn put(&self, user: &User) -> Result<(), UserCacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| UserCacheError::backend("cache lock poisoned"))?;
        entries.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn evict(&self, id: &UserId) -> Result<(), UserCacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| UserCacheError::backend("cache lock poisoned"))?;
        entries.remove(id);
        Ok(())
    }
}
