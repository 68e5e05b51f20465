//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use chrono::{TimeZone, Utc};

use crate::domain::ports::AccountService;
use crate::domain::{DisplayName, Email, User, UserId, Username};

use super::state::HttpState;

/// Cookie name used by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Wrap a (usually mocked) account service in handler state.
pub fn state_with(accounts: impl AccountService + 'static) -> HttpState {
    HttpState::new(Arc::new(accounts))
}

/// Extract the session cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Deterministic user snapshot for handler tests.
pub fn sample_user(id: &str, username: &str) -> User {
    let at = Utc
        .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp");
    User {
        id: UserId::new(id).expect("fixture id"),
        email: Email::new(format!("{username}@example.com")).expect("fixture email"),
        username: Username::new(username).expect("fixture username"),
        display_name: DisplayName::new(username).expect("fixture display name"),
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
