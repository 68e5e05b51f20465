//! State-change events announced after authoritative writes commit.
//!
//! Events are write-once facts. The coordinator builds them and hands them to
//! an [`AccountEventPublisher`](super::ports::AccountEventPublisher); nothing
//! in this crate reads them back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use super::trace_id::TraceId;
use super::user::{User, UserId};

/// Account lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// A new account was created.
    Registered {
        /// Snapshot after insert.
        user: User,
        /// Commit time.
        at: DateTime<Utc>,
    },
    /// Profile fields changed.
    Updated {
        /// Snapshot after the update.
        user: User,
        /// Commit time.
        at: DateTime<Utc>,
    },
    /// A user authenticated successfully.
    LoggedIn {
        /// Snapshot including the new `last_login`.
        user: User,
        /// Login time.
        at: DateTime<Utc>,
    },
    /// A follow edge was committed.
    Followed {
        /// User doing the following.
        follower_id: UserId,
        /// User being followed.
        followee_id: UserId,
        /// Commit time.
        at: DateTime<Utc>,
    },
}

impl AccountEvent {
    /// Stable type tag used for routing.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "user.registered",
            Self::Updated { .. } => "user.updated",
            Self::LoggedIn { .. } => "user.login",
            Self::Followed { .. } => "user.follow",
        }
    }

    /// User the event is about. For follows this is the follower.
    #[must_use]
    pub fn subject_id(&self) -> &UserId {
        match self {
            Self::Registered { user, .. }
            | Self::Updated { user, .. }
            | Self::LoggedIn { user, .. } => {
                &user.id
            }
            Self::Followed { follower_id, .. } => follower_id,
        }
    }

    /// When the transition happened.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Registered { at, .. }
            | Self::Updated { at, .. }
            | Self::LoggedIn { at, .. }
            | Self::Followed { at, .. } => *at,
        }
    }

    /// Build the wire envelope, stamping the trace id in scope, if any.
    ///
    /// Fails only if the user snapshot cannot be encoded as JSON.
    pub fn envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        let payload = match self {
            Self::Registered { user, .. }
            | Self::Updated { user, .. }
            | Self::LoggedIn { user, .. } => {
                serde_json::to_value(user)?
            }
            Self::Followed {
                follower_id,
                followee_id,
                ..
            } => json!({
                "followerId": follower_id,
                "followeeId": followee_id,
                "action": "follow",
            }),
        };
        Ok(EventEnvelope {
            event_type: self.event_type(),
            subject_id: self.subject_id().to_string(),
            payload,
            occurred_at: self.occurred_at(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }
}

/// Serialized form handed to the event stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// See [`AccountEvent::event_type`].
    pub event_type: &'static str,
    /// See [`AccountEvent::subject_id`].
    pub subject_id: String,
    /// Non-secret snapshot or follow pair.
    pub payload: Value,
    /// See [`AccountEvent::occurred_at`].
    pub occurred_at: DateTime<Utc>,
    /// Correlation id of the originating request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}
