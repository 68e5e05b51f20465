//! In-process adapters for running without PostgreSQL or Redis.
//!
//! [`InMemoryAccountStore`] enforces the same invariants as the SQL schema:
//! identity uniqueness among active users, one edge per ordered pair, and
//! all-or-nothing follow writes. State lives behind one mutex, so each call
//! is serialised; that stands in for the row locking the database provides.

mod account_store;
#[cfg(test)]
mod user_cache;

pub use account_store::InMemoryAccountStore;
#[cfg(test)]
pub use user_cache::InMemoryUserCache;
