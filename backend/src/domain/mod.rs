//! Domain primitives, ports, and the account coordinator.
//!
//! Purpose: define strongly typed account and follow-graph entities and the
//! coordinator that keeps the record store, read cache, and event stream
//! consistent. Nothing here depends on Actix, Diesel, or Redis.
//!
//! Public surface:
//! - [`AccountCoordinator`]: implements the [`ports::AccountService`] driving port.
//! - [`AccountError`]: classified coordinator failures.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.
//! - [`User`], [`FollowEdge`], [`AccountEvent`]: data model.

pub mod account;
pub mod account_coordinator;
pub mod account_error;
pub mod account_events;
pub mod auth;
pub mod error;
pub mod follow;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account::{NewAccount, ProfilePatch, ProfileValidationError, validate_country};
pub use self::account_coordinator::{AccountCoordinator, AccountPorts, DEFAULT_CACHE_TIMEOUT};
pub use self::account_error::AccountError;
pub use self::account_events::{AccountEvent, EventEnvelope};
pub use self::auth::{CredentialValidationError, LoginCredentials, Password, PasswordHash};
pub use self::error::{Error, ErrorCode};
pub use self::follow::{FollowEdge, SelfFollowError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, Email, StoredCredentials, User, UserId, UserValidationError, Username,
};
