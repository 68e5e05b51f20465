//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP operation in the inbound layer together
//! with the request and response bodies they exchange, plus the session
//! cookie security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::users::{RegisterRequest, UpdateProfileRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "User graph API",
        description = "Account registration, session login, profiles, follows and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::follow_user,
        crate::inbound::http::auth::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Error,
        ErrorCode,
        RegisterRequest,
        UpdateProfileRequest,
        LoginRequest
    )),
    tags(
        (name = "users", description = "Account lifecycle and follow graph"),
        (name = "auth", description = "Session login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
