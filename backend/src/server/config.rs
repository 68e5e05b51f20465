//! Service configuration loaded via OrthoConfig.
//!
//! Every field can come from CLI flags, `USER_GRAPH_*` environment variables,
//! or a config file. Optional values fall back to the defaults below through
//! accessor methods.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use user_graph::outbound::events::StreamConfig;
use user_graph::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_TIMEOUT_MS: u64 = 250;
const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Runtime settings for the service binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_GRAPH")]
pub struct ServiceSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the service keeps accounts
    /// in memory.
    pub database_url: Option<String>,
    /// Redis connection string for the read cache and event stream.
    pub redis_url: Option<String>,
    /// Base TTL for cached user snapshots.
    pub cache_ttl_secs: Option<u64>,
    /// Deadline for a single cache call.
    pub cache_timeout_ms: Option<u64>,
    /// Prefix for event stream keys.
    pub event_stream_prefix: Option<String>,
    /// Approximate maximum length of each event stream.
    pub event_stream_max_len: Option<u64>,
    /// Events buffered in memory ahead of the stream appender.
    pub event_buffer: Option<usize>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Apply pending schema migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Maximum PostgreSQL connections.
    pub db_pool_max_size: Option<u32>,
}

/// Raised when a setting cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The session key file could not be read and ephemeral keys are disabled.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is shorter than the minimum.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

impl ServiceSettings {
    /// Parsed listener address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Base TTL before jitter.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    /// Per-call cache deadline.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms.unwrap_or(DEFAULT_CACHE_TIMEOUT_MS))
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    /// Stream naming and buffering, defaulting field by field.
    pub fn stream_config(&self) -> StreamConfig {
        let defaults = StreamConfig::default();
        StreamConfig {
            prefix: self
                .event_stream_prefix
                .clone()
                .unwrap_or(defaults.prefix),
            max_len: self.event_stream_max_len.unwrap_or(defaults.max_len),
            buffer: self.event_buffer.unwrap_or(defaults.buffer),
        }
    }

    /// PostgreSQL pool settings, when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.db_pool_max_size.unwrap_or(DEFAULT_DB_POOL_MAX_SIZE))
        })
    }

    pub fn session_key_path(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Load the cookie signing key.
    ///
    /// Falls back to a generated key only when `session_allow_ephemeral` is
    /// set; sessions then do not survive a restart.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_path();
        match std::fs::read(path) {
            Ok(bytes) => {
                let bytes = Zeroizing::new(bytes);
                if bytes.len() < SESSION_KEY_MIN_LEN {
                    return Err(SettingsError::KeyTooShort {
                        path: path.to_path_buf(),
                        length: bytes.len(),
                        min_len: SESSION_KEY_MIN_LEN,
                    });
                }
                Ok(Key::derive_from(&bytes))
            }
            Err(error) if self.session_allow_ephemeral => {
                warn!(path = %path.display(), %error, "using temporary session key");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
