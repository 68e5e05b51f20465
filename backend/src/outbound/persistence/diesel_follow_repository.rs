//! PostgreSQL-backed `FollowRepository` adapter.
//!
//! The edge insert and both counter increments run in one transaction, so
//! either all three rows change or none do.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{FollowPersistenceError, FollowRepository};
use crate::domain::{FollowEdge, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::{user_follows, users};

/// Diesel-backed implementation of the follow repository port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Following,
    Follower,
}

/// Failures raised inside the follow transaction.
#[derive(Debug)]
enum FollowTxError {
    Diesel(diesel::result::Error),
    MissingParticipant(Uuid),
}

impl From<diesel::result::Error> for FollowTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> FollowPersistenceError {
    FollowPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> FollowPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => FollowPersistenceError::DuplicateEdge,
        DieselFailure::Connection(message) => FollowPersistenceError::connection(message),
        DieselFailure::Query(message) => FollowPersistenceError::query(message),
    }
}

fn map_tx_error(error: FollowTxError) -> FollowPersistenceError {
    match error {
        FollowTxError::Diesel(error) => map_diesel_error(error),
        FollowTxError::MissingParticipant(id) => {
            FollowPersistenceError::missing_participant(&UserId::from_uuid(id))
        }
    }
}

/// Counter bumps ordered by row id so opposing follows lock rows in the same
/// order.
fn increment_plan(follower: Uuid, followee: Uuid) -> [(Uuid, Counter); 2] {
    let mut plan = [(follower, Counter::Following), (followee, Counter::Follower)];
    plan.sort_by_key(|(id, _)| *id);
    plan
}

async fn increment(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    counter: Counter,
) -> Result<(), FollowTxError> {
    let target = users::table
        .filter(users::id.eq(id))
        .filter(users::is_active.eq(true));
    let updated = match counter {
        Counter::Following => {
            diesel::update(target)
                .set(users::following_count.eq(users::following_count + 1_i64))
                .execute(conn)
                .await?
        }
        Counter::Follower => {
            diesel::update(target)
                .set(users::follower_count.eq(users::follower_count + 1_i64))
                .execute(conn)
                .await?
        }
    };
    if updated == 0 {
        return Err(FollowTxError::MissingParticipant(id));
    }
    Ok(())
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn edge_exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            user_follows::table
                .filter(user_follows::follower_id.eq(*follower.as_uuid()))
                .filter(user_follows::followee_id.eq(*followee.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_edge(&self, edge: &FollowEdge) -> Result<(), FollowPersistenceError> {
        let row = NewFollowRow {
            follower_id: *edge.follower().as_uuid(),
            followee_id: *edge.followee().as_uuid(),
            created_at: edge.created_at(),
        };
        let plan = increment_plan(row.follower_id, row.followee_id);

        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(user_follows::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                for (id, counter) in plan {
                    increment(conn, id, counter).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn increments_are_ordered_by_row_id() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);

        assert_eq!(
            increment_plan(high, low),
            [(low, Counter::Follower), (high, Counter::Following)]
        );
        assert_eq!(
            increment_plan(low, high),
            [(low, Counter::Following), (high, Counter::Follower)]
        );
    }

    #[rstest]
    fn primary_key_violation_is_a_duplicate_edge() {
        let error = FollowTxError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        ));
        assert_eq!(map_tx_error(error), FollowPersistenceError::DuplicateEdge);
    }

    #[rstest]
    fn zero_row_update_names_the_participant() {
        let id = Uuid::from_u128(7);
        let error = map_tx_error(FollowTxError::MissingParticipant(id));
        assert_eq!(
            error,
            FollowPersistenceError::missing_participant(&UserId::from_uuid(id))
        );
    }

    #[rstest]
    fn dropped_connection_is_a_connection_error() {
        let error = map_tx_error(FollowTxError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        )));
        assert!(matches!(error, FollowPersistenceError::Connection { .. }));
    }
}
