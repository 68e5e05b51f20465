//! Shared helpers for integration tests that need live backing services.
//!
//! Suites read their connection string from an environment variable and
//! skip with a `SKIP-TEST-*` marker when it is unset, so a plain
//! `cargo test` stays green on machines without PostgreSQL or Redis.

use chrono::{DateTime, SubsecRound, Utc};
use user_graph::domain::{DisplayName, Email, User, UserId, Username};

pub const DATABASE_URL_ENV: &str = "USER_GRAPH_TEST_DATABASE_URL";
pub const REDIS_URL_ENV: &str = "USER_GRAPH_TEST_REDIS_URL";

/// Return the configured URL, or print a skip marker and return `None`.
pub fn service_url(var: &str, marker: &str, test: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("{marker}: {test} skipped ({var} unset)");
            None
        }
    }
}

/// Current time at the precision PostgreSQL stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// An active user with a unique identity so suites can share a database.
pub fn fresh_user(label: &str) -> User {
    let id = UserId::random();
    let tag = id.as_uuid().simple().to_string();
    let short = tag.get(..12).unwrap_or(&tag).to_owned();
    let at = now();
    User {
        email: Email::new(format!("{label}-{short}@example.com")).expect("email"),
        username: Username::new(format!("{label}_{short}")).expect("username"),
        display_name: DisplayName::new(label).expect("display name"),
        id,
        profile_image_url: None,
        bio: None,
        country: None,
        is_verified: false,
        is_artist: false,
        is_active: true,
        follower_count: 0,
        following_count: 0,
        created_at: at,
        updated_at: at,
        last_login: None,
    }
}
