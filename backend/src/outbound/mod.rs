//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process store and cache for local runs and tests
//! - **cache**: Redis-backed user snapshot cache
//! - **events**: Redis Streams and logging event publishers
//! - **crypto**: bcrypt password hashing
//! - **metrics**: Prometheus counters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod crypto;
pub mod events;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod redis_pool;
