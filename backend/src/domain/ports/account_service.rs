//! Driving port exposing the account coordinator to inbound adapters.

use async_trait::async_trait;

use crate::domain::{AccountError, LoginCredentials, NewAccount, ProfilePatch, User, UserId};

/// Account and social-graph operations.
///
/// Inbound adapters depend on this trait rather than on
/// [`AccountCoordinator`](crate::domain::AccountCoordinator) so handlers can
/// be tested against mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a new account.
    async fn register(&self, account: NewAccount) -> Result<User, AccountError>;

    /// Read an active user, cache first.
    async fn get_by_id(&self, id: &UserId) -> Result<User, AccountError>;

    /// Apply a partial profile update.
    async fn update_profile(&self, id: &UserId, patch: ProfilePatch)
    -> Result<User, AccountError>;

    /// Check credentials and record the login.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, AccountError>;

    /// Make `follower` follow `followee`.
    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<(), AccountError>;
}
