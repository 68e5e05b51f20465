//! Failure taxonomy of the account coordinator.

use thiserror::Error;

use super::error::Error;

/// Classified outcome of a failed coordinator operation.
///
/// Messages never carry store, cache, or hashing detail; adapters log those
/// where the failure is first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Email or username already belongs to an active user.
    #[error("email or username already registered")]
    DuplicateIdentity,
    /// No active user with the requested identifier.
    #[error("user not found")]
    NotFound,
    /// Unknown email or wrong password; the two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Follower and followee are the same user.
    #[error("users cannot follow themselves")]
    SelfFollowNotAllowed,
    /// The follow edge already exists.
    #[error("already following this user")]
    AlreadyFollowing,
    /// The record store failed or rejected the write.
    #[error("account storage is unavailable")]
    PersistenceFailure,
    /// The password hashing primitive failed.
    #[error("failed to process credentials")]
    HashingFailure,
}

impl From<AccountError> for Error {
    fn from(value: AccountError) -> Self {
        let message = value.to_string();
        match value {
            AccountError::DuplicateIdentity | AccountError::AlreadyFollowing => {
                Self::conflict(message)
            }
            AccountError::NotFound => Self::not_found(message),
            AccountError::InvalidCredentials => Self::unauthorized(message),
            AccountError::SelfFollowNotAllowed => Self::invalid_request(message),
            AccountError::PersistenceFailure => Self::service_unavailable(message),
            AccountError::HashingFailure => Self::internal(message),
        }
    }
}
