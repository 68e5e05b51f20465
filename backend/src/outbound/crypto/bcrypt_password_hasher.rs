//! `bcrypt`-backed `PasswordHasher` adapter.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking pool
//! rather than on an async worker. Plaintext copies moved onto that pool are
//! zeroized on drop.

use async_trait::async_trait;
use bcrypt::BcryptError;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// Lowest accepted work factor.
pub const MIN_BCRYPT_COST: u32 = 10;

const MAX_BCRYPT_COST: u32 = 31;

/// Salted bcrypt hashing with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    ///
    /// Rejects costs outside `10..=31`.
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(PasswordHashError::primitive(format!(
                "bcrypt cost {cost} outside {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}"
            )));
        }
        Ok(Self { cost })
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

fn map_verify_error(error: BcryptError) -> PasswordHashError {
    match error {
        BcryptError::InvalidHash(_)
        | BcryptError::InvalidPrefix(_)
        | BcryptError::InvalidCost(_)
        | BcryptError::InvalidSaltLen(_)
        | BcryptError::InvalidBase64(_) => PasswordHashError::MalformedHash,
        other => PasswordHashError::primitive(other.to_string()),
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHashError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        warn!(error = %err, "password hashing task failed");
        PasswordHashError::primitive(err.to_string())
    })?
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let secret = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        run_blocking(move || {
            bcrypt::hash(secret.as_str(), cost)
                .map(PasswordHash::new)
                .map_err(|err| PasswordHashError::primitive(err.to_string()))
        })
        .await
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let candidate = Zeroizing::new(candidate.to_owned());
        let hash = hash.as_str().to_owned();
        run_blocking(move || bcrypt::verify(candidate.as_str(), &hash).map_err(map_verify_error))
            .await
    }
}
