//! User account and follow-graph handlers.
//!
//! ```text
//! POST /api/v1/users               register
//! GET  /api/v1/users/{id}          fetch a snapshot
//! PUT  /api/v1/users/{id}          partial profile update (owner only)
//! POST /api/v1/users/{id}/follow   session user follows {id}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    DisplayName, Email, Error, NewAccount, Password, ProfilePatch, User, Username,
    validate_country,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_credential_validation, map_profile_validation, map_user_validation, parse_user_id,
};

/// Registration payload for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice")]
    pub display_name: String,
    #[schema(example = "correct horse battery")]
    pub password: String,
    pub country: Option<String>,
    #[serde(default)]
    pub is_artist: bool,
}

/// Partial profile update for `PUT /api/v1/users/{id}`. Absent fields keep
/// their stored values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub profile_image_url: Option<String>,
}

fn parse_register_request(payload: RegisterRequest) -> Result<NewAccount, Error> {
    let RegisterRequest {
        email,
        username,
        display_name,
        password,
        country,
        is_artist,
    } = payload;
    let password = Zeroizing::new(password);
    Ok(NewAccount {
        email: Email::new(&email).map_err(|err| map_user_validation(&err))?,
        username: Username::new(username).map_err(|err| map_user_validation(&err))?,
        display_name: DisplayName::new(&display_name).map_err(|err| map_user_validation(&err))?,
        password: Password::new(&password).map_err(|err| map_credential_validation(&err))?,
        country: validate_country(country).map_err(|err| map_profile_validation(&err))?,
        is_artist,
    })
}

fn parse_update_request(payload: UpdateProfileRequest) -> Result<ProfilePatch, Error> {
    let display_name = payload
        .display_name
        .map(DisplayName::new)
        .transpose()
        .map_err(|err| map_user_validation(&err))?;
    ProfilePatch::new(
        display_name,
        payload.bio,
        payload.country,
        payload.profile_image_url,
    )
    .map_err(|err| map_profile_validation(&err))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username already registered", body = Error),
        (status = 503, description = "Account storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let account = parse_register_request(payload.into_inner())?;
    let user = state.accounts.register(account).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch an active user's snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User snapshot", body = User),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "No active user with this id", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.accounts.get_by_id(&id).await?;
    Ok(web::Json(user))
}

/// Update the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated snapshot", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Session belongs to another user", body = Error),
        (status = 404, description = "No active user with this id", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    session.require_owner(&id)?;
    let patch = parse_update_request(payload.into_inner())?;
    let user = state.accounts.update_profile(&id, patch).await?;
    Ok(web::Json(user))
}

/// Follow `{id}` as the session user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "User to follow (UUID)")),
    responses(
        (status = 204, description = "Now following"),
        (status = 400, description = "Invalid identifier or self-follow", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Already following", body = Error),
        (status = 503, description = "Account storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "followUser"
)]
#[post("/users/{id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let followee = parse_user_id(&path.into_inner())?;
    state.accounts.follow(&follower, &followee).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
