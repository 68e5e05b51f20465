//! Port abstraction for the one-way password hashing primitive.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Password, PasswordHash};

/// Failures of the hashing primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Hashing or verification failed inside the primitive.
    #[error("password hashing failed: {message}")]
    Primitive {
        /// Adapter-level detail.
        message: String,
    },
    /// The stored hash is not in a recognised format.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

impl PasswordHashError {
    /// Build a [`PasswordHashError::Primitive`].
    pub fn primitive(message: impl Into<String>) -> Self {
        Self::Primitive {
            message: message.into(),
        }
    }
}

/// Salted, cost-versioned hashing with constant-time verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a new password with a fresh salt.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Check `candidate` against `hash`.
    async fn verify(&self, candidate: &str, hash: &PasswordHash)
    -> Result<bool, PasswordHashError>;
}
