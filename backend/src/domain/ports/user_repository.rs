//! Port abstraction for the authoritative user record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Email, PasswordHash, ProfilePatch, StoredCredentials, User, UserId, Username};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level detail, for logs only.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level detail, for logs only.
        message: String,
    },
    /// A uniqueness constraint on email or username rejected the write.
    #[error("user identity already exists: {constraint}")]
    Duplicate {
        /// Name of the violated constraint.
        constraint: String,
    },
}

impl UserPersistenceError {
    /// Build a [`UserPersistenceError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`UserPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a [`UserPersistenceError::Duplicate`].
    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

/// Record store operations on user rows.
///
/// Every read filters to active users. Writes are single statements; the
/// only multi-row transaction lives in
/// [`FollowRepository`](super::FollowRepository).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `true` when an active user already holds `email` or `username`.
    async fn identity_taken(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<bool, UserPersistenceError>;

    /// Insert a freshly registered user.
    ///
    /// Unique-constraint races surface as [`UserPersistenceError::Duplicate`].
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch an active user by identifier.
    async fn find_active_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an active user and their password hash by email.
    async fn find_active_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Apply `patch` in one statement and return the updated row.
    ///
    /// Absent fields keep their stored value; `updated_at` is always set to
    /// `at`. Returns `None` when no active row matched.
    async fn update_profile(
        &self,
        id: &UserId,
        patch: &ProfilePatch,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Stamp `last_login` on an active user.
    async fn record_login(&self, id: &UserId, at: DateTime<Utc>)
    -> Result<(), UserPersistenceError>;
}
