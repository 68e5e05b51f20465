//! Domain ports and supporting types for the hexagonal boundary.

mod account_metrics;
mod account_service;
mod event_publisher;
mod follow_repository;
mod password_hasher;
mod user_cache;
mod user_repository;

#[cfg(test)]
pub use account_metrics::MockAccountMetrics;
pub use account_metrics::{AccountMetrics, AccountMetricsError, NoOpAccountMetrics};
pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
#[cfg(test)]
pub use event_publisher::MockAccountEventPublisher;
pub use event_publisher::{AccountEventPublisher, EventPublishError};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowPersistenceError, FollowRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_cache::MockUserCache;
pub use user_cache::{NoOpUserCache, UserCache, UserCacheError, UserCacheKey};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
