//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation, so a corrupt row surfaces as a query
//! error instead of an invalid [`User`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    DisplayName, Email, PasswordHash, ProfilePatch, StoredCredentials, User, UserId, Username,
};

use super::schema::{user_follows, users};

/// Snapshot columns of a user row; excludes `password_hash`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub is_verified: bool,
    pub is_artist: bool,
    pub is_active: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Snapshot columns plus the stored hash, for authentication only.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

/// Insertable struct for newly registered users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
    pub profile_image_url: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub country: Option<&'a str>,
    pub is_verified: bool,
    pub is_artist: bool,
    pub is_active: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Partial profile update. Diesel skips `None` fields, keeping stored values.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub display_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub country: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> ProfileChangeset<'a> {
    pub(crate) fn from_patch(patch: &'a ProfilePatch, at: DateTime<Utc>) -> Self {
        Self {
            display_name: patch.display_name().map(AsRef::as_ref),
            bio: patch.bio(),
            country: patch.country(),
            profile_image_url: patch.profile_image_url(),
            updated_at: at,
        }
    }
}

/// Insertable struct for follow edges.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_follows)]
pub(crate) struct NewFollowRow {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Why a stored row could not become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored user {id} is invalid: {reason}")]
pub(crate) struct InvalidUserRow {
    pub id: Uuid,
    pub reason: String,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(
        user: &'a User,
        password_hash: &'a PasswordHash,
    ) -> Result<Self, InvalidUserRow> {
        let counter = |value: u64| {
            i64::try_from(value).map_err(|_| InvalidUserRow {
                id: *user.id.as_uuid(),
                reason: "counter overflows BIGINT".to_owned(),
            })
        };
        Ok(Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            username: user.username.as_ref(),
            display_name: user.display_name.as_ref(),
            password_hash: password_hash.as_str(),
            profile_image_url: user.profile_image_url.as_deref(),
            bio: user.bio.as_deref(),
            country: user.country.as_deref(),
            is_verified: user.is_verified,
            is_artist: user.is_artist,
            is_active: user.is_active,
            follower_count: counter(user.follower_count)?,
            following_count: counter(user.following_count)?,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login: user.last_login,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = InvalidUserRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |reason: String| InvalidUserRow { id, reason };
        let counter = |value: i64, column: &str| {
            u64::try_from(value).map_err(|_| invalid(format!("{column} is negative")))
        };
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: Email::new(&row.email).map_err(|err| invalid(err.to_string()))?,
            username: Username::new(row.username).map_err(|err| invalid(err.to_string()))?,
            display_name: DisplayName::new(&row.display_name)
                .map_err(|err| invalid(err.to_string()))?,
            profile_image_url: row.profile_image_url,
            bio: row.bio,
            country: row.country,
            is_verified: row.is_verified,
            is_artist: row.is_artist,
            is_active: row.is_active,
            follower_count: counter(row.follower_count, "follower_count")?,
            following_count: counter(row.following_count, "following_count")?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        })
    }
}

impl TryFrom<CredentialRow> for StoredCredentials {
    type Error = InvalidUserRow;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(row.user)?,
            password_hash: PasswordHash::new(row.password_hash),
        })
    }
}
