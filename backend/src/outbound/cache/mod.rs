//! Read-cache adapters for user snapshots.
//!
//! [`RedisUserCache`] stores JSON snapshots under namespaced keys with a
//! jittered TTL so entries written together do not expire together.

mod redis_user_cache;

pub use redis_user_cache::{RedisUserCache, jittered_ttl_secs};
