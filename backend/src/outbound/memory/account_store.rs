//! Mutex-guarded record store implementing both repository ports.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    FollowPersistenceError, FollowRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, FollowEdge, PasswordHash, ProfilePatch, StoredCredentials, User, UserId, Username,
};

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: HashMap<UserId, StoredCredentials>,
    edges: HashSet<(UserId, UserId)>,
}

impl StoreState {
    fn active(&self, id: &UserId) -> Option<&StoredCredentials> {
        self.users.get(id).filter(|row| row.user.is_active)
    }

    fn active_mut(&mut self, id: &UserId) -> Option<&mut StoredCredentials> {
        self.users.get_mut(id).filter(|row| row.user.is_active)
    }

    fn identity_taken(&self, email: &Email, username: &Username) -> bool {
        self.users
            .values()
            .filter(|row| row.user.is_active)
            .any(|row| &row.user.email == email || &row.user.username == username)
    }
}

/// Record store held entirely in memory.
///
/// Follow writes are applied to a staged copy and swapped in only once every
/// step has succeeded.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    state: Mutex<StoreState>,
    fail_followee_counter: AtomicBool,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Clear `is_active`, hiding the user from every read.
    ///
    /// Returns `false` when the user does not exist.
    pub fn deactivate(&self, id: &UserId) -> bool {
        let Ok(mut state) = self.lock() else {
            return false;
        };
        state
            .users
            .get_mut(id)
            .map(|row| row.user.is_active = false)
            .is_some()
    }

    /// Make the next follow fail after the edge and the follower's counter
    /// have been staged, exercising rollback.
    pub fn fail_next_followee_counter_update(&self) {
        self.fail_followee_counter.store(true, Ordering::SeqCst);
    }

    /// Number of stored users, active or not.
    pub fn user_count(&self) -> usize {
        self.lock().map(|state| state.users.len()).unwrap_or_default()
    }

    /// Number of stored follow edges.
    pub fn edge_count(&self) -> usize {
        self.lock().map(|state| state.edges.len()).unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryAccountStore {
    async fn identity_taken(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state.identity_taken(email, username))
    }

    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if state.identity_taken(&user.email, &user.username) {
            return Err(UserPersistenceError::duplicate("users_identity_active_key"));
        }
        if state.users.contains_key(&user.id) {
            return Err(UserPersistenceError::duplicate("users_pkey"));
        }
        state.users.insert(
            user.id.clone(),
            StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_active_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state.active(id).map(|row| row.user.clone()))
    }

    async fn find_active_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .users
            .values()
            .find(|row| row.user.is_active && &row.user.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        patch: &ProfilePatch,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        let Some(row) = state.active_mut(id) else {
            return Ok(None);
        };
        let user = &mut row.user;
        if let Some(display_name) = patch.display_name() {
            user.display_name = display_name.clone();
        }
        if let Some(bio) = patch.bio() {
            user.bio = Some(bio.to_owned());
        }
        if let Some(country) = patch.country() {
            user.country = Some(country.to_owned());
        }
        if let Some(url) = patch.profile_image_url() {
            user.profile_image_url = Some(url.to_owned());
        }
        user.updated_at = at;
        Ok(Some(user.clone()))
    }

    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if let Some(row) = state.active_mut(id) {
            row.user.last_login = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for InMemoryAccountStore {
    async fn edge_exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let state = self.lock().map_err(FollowPersistenceError::connection)?;
        Ok(state.edges.contains(&(follower.clone(), followee.clone())))
    }

    async fn insert_edge(&self, edge: &FollowEdge) -> Result<(), FollowPersistenceError> {
        let mut state = self.lock().map_err(FollowPersistenceError::connection)?;
        let mut staged = state.clone();

        let pair = (edge.follower().clone(), edge.followee().clone());
        if staged.active(&pair.0).is_none() {
            return Err(FollowPersistenceError::missing_participant(&pair.0));
        }
        if staged.active(&pair.1).is_none() {
            return Err(FollowPersistenceError::missing_participant(&pair.1));
        }
        if !staged.edges.insert(pair) {
            return Err(FollowPersistenceError::DuplicateEdge);
        }

        let follower = staged
            .active_mut(edge.follower())
            .ok_or_else(|| FollowPersistenceError::missing_participant(edge.follower()))?;
        follower.user.following_count += 1;

        if self.fail_followee_counter.swap(false, Ordering::SeqCst) {
            return Err(FollowPersistenceError::query(
                "injected failure updating follower_count",
            ));
        }

        let followee = staged
            .active_mut(edge.followee())
            .ok_or_else(|| FollowPersistenceError::missing_participant(edge.followee()))?;
        followee.user.follower_count += 1;

        *state = staged;
        Ok(())
    }
}
