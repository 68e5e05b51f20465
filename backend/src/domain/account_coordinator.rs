//! Consistency coordinator for accounts and the follow graph.
//!
//! Every mutation follows the same order: authoritative write, then cache
//! refresh or eviction, then event hand-off. Only the record store decides
//! the outcome; cache and event failures are logged and absorbed.
//!
//! Cache calls are awaited inline under a short deadline so a read issued
//! after a write on the same task observes that write. Reads trust the cache
//! for up to its TTL. Follows evict instead of refreshing, so a snapshot
//! written through another path may lag until TTL expiry or the next
//! eviction.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::OnceCell;
use tracing::{debug, error, instrument, warn};

use super::ports::{
    AccountEventPublisher, AccountMetrics, AccountMetricsError, AccountService,
    FollowPersistenceError, FollowRepository, NoOpAccountMetrics, PasswordHashError,
    PasswordHasher, UserCache, UserCacheError, UserPersistenceError, UserRepository,
};
use super::{
    AccountError, AccountEvent, FollowEdge, LoginCredentials, NewAccount, Password,
    PasswordHash, ProfilePatch, StoredCredentials, User, UserId,
};

/// Default deadline for a single cache call.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Collaborators the coordinator writes through.
pub struct AccountPorts {
    /// Authoritative user rows.
    pub users: Arc<dyn UserRepository>,
    /// Authoritative follow edges and counters.
    pub follows: Arc<dyn FollowRepository>,
    /// Read cache of user snapshots.
    pub cache: Arc<dyn UserCache>,
    /// Outbound event stream.
    pub events: Arc<dyn AccountEventPublisher>,
    /// Password hashing primitive.
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Orchestrates the record store, read cache, and event stream.
///
/// Holds no mutable state beyond its handles; concurrent calls for the same
/// subject rely on the record store's constraints and transactions.
pub struct AccountCoordinator {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    cache: Arc<dyn UserCache>,
    events: Arc<dyn AccountEventPublisher>,
    hasher: Arc<dyn PasswordHasher>,
    metrics: Arc<dyn AccountMetrics>,
    clock: Arc<dyn Clock>,
    cache_timeout: Duration,
    decoy_hash: OnceCell<PasswordHash>,
}

impl AccountCoordinator {
    /// Build a coordinator with no-op metrics and the system clock.
    pub fn new(ports: AccountPorts) -> Self {
        let AccountPorts {
            users,
            follows,
            cache,
            events,
            hasher,
        } = ports;
        Self {
            users,
            follows,
            cache,
            events,
            hasher,
            metrics: Arc::new(NoOpAccountMetrics),
            clock: Arc::new(DefaultClock),
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Replace the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn AccountMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the clock used for timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change the per-call cache deadline.
    #[must_use]
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    async fn cache_call<T, F>(&self, op: &'static str, id: &UserId, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, UserCacheError>>,
    {
        let outcome = tokio::time::timeout(self.cache_timeout, call)
            .await
            .unwrap_or(Err(UserCacheError::Timeout));
        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%error, op, user_id = %id, "cache call failed; continuing without cache");
                None
            }
        }
    }

    async fn refresh_cache(&self, user: &User) {
        self.cache_call("put", &user.id, self.cache.put(user)).await;
    }

    async fn evict_cache(&self, id: &UserId) {
        self.cache_call("evict", id, self.cache.evict(id)).await;
    }

    fn emit(&self, event: AccountEvent) {
        let event_type = event.event_type();
        let subject_id = event.subject_id().to_string();
        if let Err(error) = self.events.publish(event) {
            warn!(%error, event_type, %subject_id, "dropping account event");
        }
    }

    fn note_metric(result: Result<(), AccountMetricsError>, metric: &'static str) {
        if let Err(error) = result {
            warn!(%error, metric, "failed to record account metric");
        }
    }

    // Unknown emails pay for one verification too, so response timing does
    // not reveal whether an account exists.
    async fn verify_decoy(&self, candidate: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| async {
                let password = Password::new(DECOY_PASSWORD)
                    .map_err(|error| PasswordHashError::primitive(error.to_string()))?;
                self.hasher.hash(&password).await
            })
            .await;
        match decoy {
            Ok(hash) => {
                if let Err(error) = self.hasher.verify(candidate, hash).await {
                    debug!(%error, "decoy verification failed");
                }
            }
            Err(error) => debug!(%error, "decoy hash unavailable"),
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> AccountError {
    match error {
        UserPersistenceError::Duplicate { constraint } => {
            debug!(%constraint, "identity uniqueness violated");
            AccountError::DuplicateIdentity
        }
        other => {
            error!(error = %other, "user repository failed");
            AccountError::PersistenceFailure
        }
    }
}

fn map_follow_error(error: FollowPersistenceError) -> AccountError {
    match error {
        FollowPersistenceError::DuplicateEdge => AccountError::AlreadyFollowing,
        FollowPersistenceError::MissingParticipant { user_id } => {
            warn!(%user_id, "follow rolled back: participant missing or inactive");
            AccountError::PersistenceFailure
        }
        other => {
            error!(error = %other, "follow repository failed");
            AccountError::PersistenceFailure
        }
    }
}

#[async_trait]
impl AccountService for AccountCoordinator {
    #[instrument(skip(self, account), fields(username = %account.username))]
    async fn register(&self, account: NewAccount) -> Result<User, AccountError> {
        let password_hash = self.hasher.hash(&account.password).await.map_err(|error| {
            error!(%error, "password hashing failed");
            AccountError::HashingFailure
        })?;

        // Advisory only; the uniqueness constraint settles races.
        if self
            .users
            .identity_taken(&account.email, &account.username)
            .await
            .map_err(map_user_error)?
        {
            return Err(AccountError::DuplicateIdentity);
        }

        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            email: account.email,
            username: account.username,
            display_name: account.display_name,
            profile_image_url: None,
            bio: None,
            country: account.country,
            is_verified: false,
            is_artist: account.is_artist,
            is_active: true,
            follower_count: 0,
            following_count: 0,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;

        self.refresh_cache(&user).await;
        self.emit(AccountEvent::Registered {
            user: user.clone(),
            at: now,
        });
        Self::note_metric(self.metrics.record_registration().await, "registration");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_by_id(&self, id: &UserId) -> Result<User, AccountError> {
        if let Some(Some(user)) = self.cache_call("get", id, self.cache.get(id)).await {
            debug!("user cache hit");
            return Ok(user);
        }
        debug!("user cache miss");

        let user = self
            .users
            .find_active_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or(AccountError::NotFound)?;
        self.refresh_cache(&user).await;
        Ok(user)
    }

    #[instrument(skip(self, patch), fields(user_id = %id, empty_patch = patch.is_empty()))]
    async fn update_profile(&self, id: &UserId, patch: ProfilePatch) -> Result<User, AccountError> {
        let now = self.clock.utc();
        let user = self
            .users
            .update_profile(id, &patch, now)
            .await
            .map_err(map_user_error)?
            .ok_or(AccountError::NotFound)?;

        // Overwrite rather than evict so the entry is never older than the row.
        self.refresh_cache(&user).await;
        self.emit(AccountEvent::Updated {
            user: user.clone(),
            at: now,
        });
        Ok(user)
    }

    #[instrument(skip(self, credentials))]
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, AccountError> {
        let stored = self
            .users
            .find_active_credentials(credentials.email())
            .await
            .map_err(map_user_error)?;
        let Some(StoredCredentials {
            mut user,
            password_hash,
        }) = stored
        else {
            self.verify_decoy(credentials.password()).await;
            return Err(AccountError::InvalidCredentials);
        };

        match self
            .hasher
            .verify(credentials.password(), &password_hash)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(AccountError::InvalidCredentials),
            Err(error) => {
                warn!(%error, user_id = %user.id, "stored hash could not be verified");
                return Err(AccountError::InvalidCredentials);
            }
        }

        let now = self.clock.utc();
        match self.users.record_login(&user.id, now).await {
            Ok(()) => user.last_login = Some(now),
            Err(error) => warn!(%error, user_id = %user.id, "failed to record last login"),
        }

        self.refresh_cache(&user).await;
        self.emit(AccountEvent::LoggedIn {
            user: user.clone(),
            at: now,
        });
        Self::note_metric(self.metrics.record_login().await, "login");
        Ok(user)
    }

    #[instrument(skip(self), fields(follower_id = %follower, followee_id = %followee))]
    async fn follow(&self, follower: &UserId, followee: &UserId) -> Result<(), AccountError> {
        let now = self.clock.utc();
        let edge = FollowEdge::new(follower.clone(), followee.clone(), now)
            .map_err(|_| AccountError::SelfFollowNotAllowed)?;

        if self
            .follows
            .edge_exists(follower, followee)
            .await
            .map_err(map_follow_error)?
        {
            return Err(AccountError::AlreadyFollowing);
        }

        self.follows
            .insert_edge(&edge)
            .await
            .map_err(map_follow_error)?;

        // Post-commit only. Counters changed on both rows and the new values
        // are not in hand, so evict and let the next read repopulate.
        self.evict_cache(follower).await;
        self.evict_cache(followee).await;
        self.emit(AccountEvent::Followed {
            follower_id: follower.clone(),
            followee_id: followee.clone(),
            at: now,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_coordinator_tests.rs"]
mod tests;
