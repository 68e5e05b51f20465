//! Port abstraction for follow edges and their denormalized counters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{FollowEdge, UserId};

/// Persistence errors raised by follow repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FollowPersistenceError {
    /// Repository connection could not be established.
    #[error("follow repository connection failed: {message}")]
    Connection {
        /// Adapter-level detail, for logs only.
        message: String,
    },
    /// Query or mutation failed; the transaction was rolled back.
    #[error("follow repository query failed: {message}")]
    Query {
        /// Adapter-level detail, for logs only.
        message: String,
    },
    /// The `(follower, followee)` pair already exists.
    #[error("follow edge already exists")]
    DuplicateEdge,
    /// A participant is missing or inactive; the transaction was rolled back.
    #[error("follow participant {user_id} is missing or inactive")]
    MissingParticipant {
        /// The user whose counter row could not be updated.
        user_id: String,
    },
}

impl FollowPersistenceError {
    /// Build a [`FollowPersistenceError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`FollowPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a [`FollowPersistenceError::MissingParticipant`].
    pub fn missing_participant(user_id: &UserId) -> Self {
        Self::MissingParticipant {
            user_id: user_id.to_string(),
        }
    }
}

/// Record store operations on the follow relation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// `true` when the ordered pair already has an edge.
    async fn edge_exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError>;

    /// Insert `edge` and bump both counters in one transaction.
    ///
    /// The edge row, the follower's `following_count` and the followee's
    /// `follower_count` change together or not at all.
    async fn insert_edge(&self, edge: &FollowEdge) -> Result<(), FollowPersistenceError>;
}
