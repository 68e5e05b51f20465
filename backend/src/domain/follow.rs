//! Directed follow relationship between two users.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::user::UserId;

/// Raised when an edge would point a user at themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a user cannot follow themselves")]
pub struct SelfFollowError;

/// A `follower -> followee` edge.
///
/// ## Invariants
/// - `follower != followee`; enforced by [`FollowEdge::new`] and again by a
///   `CHECK` constraint in the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowEdge {
    follower: UserId,
    followee: UserId,
    created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// Construct an edge, rejecting self-follows.
    pub fn new(
        follower: UserId,
        followee: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SelfFollowError> {
        if follower == followee {
            return Err(SelfFollowError);
        }
        Ok(Self {
            follower,
            followee,
            created_at,
        })
    }

    /// User doing the following.
    pub fn follower(&self) -> &UserId {
        &self.follower
    }

    /// User being followed.
    pub fn followee(&self) -> &UserId {
        &self.followee
    }

    /// When the edge was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn self_follow_is_rejected() {
        let id = UserId::random();
        assert_eq!(
            FollowEdge::new(id.clone(), id, Utc::now()),
            Err(SelfFollowError)
        );
    }

    #[rstest]
    fn distinct_users_form_an_edge() {
        let (a, b) = (UserId::random(), UserId::random());
        let edge = FollowEdge::new(a.clone(), b.clone(), Utc::now()).expect("distinct users");
        assert_eq!(edge.follower(), &a);
        assert_eq!(edge.followee(), &b);
    }
}
