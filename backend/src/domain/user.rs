//! User identity and profile model.
//!
//! Every identity field is a validated newtype so the coordinator and its
//! adapters never see an unchecked email, username, or display name. The
//! stored password hash is deliberately absent from [`User`]: it only travels
//! inside [`StoredCredentials`], which has no serde implementation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::PasswordHash;

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 50;
/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 1;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors raised by the identity newtypes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The email address was malformed.
    #[error("email must be a valid address of at most {max} characters")]
    InvalidEmail {
        /// Upper bound on the address length.
        max: usize,
    },
    /// The username length was out of range.
    #[error("username must be between {min} and {max} characters")]
    UsernameLength {
        /// Lower bound on the username length.
        min: usize,
        /// Upper bound on the username length.
        max: usize,
    },
    /// The username contained characters outside the allowed set.
    #[error("username may only contain letters, numbers, '_', '.', or '-'")]
    UsernameInvalidCharacters,
    /// The display name was blank or too long.
    #[error("display name must be between {min} and {max} characters")]
    DisplayNameLength {
        /// Lower bound on the display name length.
        min: usize,
        /// Upper bound on the display name length.
        max: usize,
    },
}

/// Stable user identifier stored as a UUID.
///
/// Any spelling `Uuid::parse_str` accepts is normalised to the lowercase
/// hyphenated form, so equality, hashing and cache keys agree across inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from the record store.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address used as the login identity.
///
/// Surrounding whitespace is trimmed. The check is structural only: one `@`,
/// a non-empty local part, and a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        let invalid = UserValidationError::InvalidEmail { max: EMAIL_MAX };
        if trimmed.chars().count() > EMAIL_MAX || trimmed.chars().any(char::is_whitespace) {
            return Err(invalid);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(invalid);
        };
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok {
            return Err(invalid);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public handle, unique across active users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        let length = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
        if !username.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]. Surrounding whitespace is trimmed.
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = display_name.as_ref().trim();
        let length = trimmed.chars().count();
        if !(DISPLAY_NAME_MIN..=DISPLAY_NAME_MAX).contains(&length) {
            return Err(UserValidationError::DisplayNameLength {
                min: DISPLAY_NAME_MIN,
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-secret user snapshot.
///
/// This is the shape returned to clients, stored in the read cache, and
/// embedded in event payloads.
///
/// ## Invariants
/// - `follower_count` and `following_count` mirror the follow relation once
///   in-flight follows settle.
/// - `is_active` is `true` for every user returned by a read; deactivated
///   rows are filtered by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    /// Unique login email.
    #[schema(value_type = String, example = "alice@example.com")]
    pub email: Email,
    /// Unique public handle.
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    /// Name shown to other users.
    #[schema(value_type = String, example = "Alice")]
    pub display_name: DisplayName,
    /// Avatar location.
    pub profile_image_url: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Self-reported country.
    pub country: Option<String>,
    /// Whether the account has been verified.
    pub is_verified: bool,
    /// Whether the account belongs to an artist.
    pub is_artist: bool,
    /// Cleared on soft deactivation.
    pub is_active: bool,
    /// Number of users following this user.
    pub follower_count: u64,
    /// Number of users this user follows.
    pub following_count: u64,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last profile or counter mutation.
    pub updated_at: DateTime<Utc>,
    /// Most recent successful login.
    pub last_login: Option<DateTime<Utc>>,
}

/// Active user together with their stored password hash.
///
/// Only produced by the credential lookup that backs authentication.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// The non-secret snapshot.
    pub user: User,
    /// Hash to verify the presented password against.
    pub password_hash: PasswordHash,
}
