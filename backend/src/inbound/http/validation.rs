//! Translation of domain validation failures into `400` responses.
//!
//! Every failure carries `details.field` (the JSON field name) and
//! `details.code` (a stable snake_case reason).

use serde_json::json;

use crate::domain::{
    CredentialValidationError, Error, ProfileValidationError, UserId, UserValidationError,
};

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Map identity field failures.
pub(crate) fn map_user_validation(error: &UserValidationError) -> Error {
    let (field, code) = match error {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "invalid_id"),
        UserValidationError::InvalidEmail { .. } => ("email", "invalid_email"),
        UserValidationError::UsernameLength { .. } => ("username", "username_length"),
        UserValidationError::UsernameInvalidCharacters => ("username", "username_characters"),
        UserValidationError::DisplayNameLength { .. } => ("displayName", "display_name_length"),
    };
    field_error(field, code, error.to_string())
}

/// Map password and login failures.
pub(crate) fn map_credential_validation(error: &CredentialValidationError) -> Error {
    match error {
        CredentialValidationError::Email(inner) => map_user_validation(inner),
        CredentialValidationError::EmptyPassword => {
            field_error("password", "empty_password", error.to_string())
        }
        CredentialValidationError::PasswordTooShort { .. } => {
            field_error("password", "password_too_short", error.to_string())
        }
    }
}

/// Map optional profile field failures.
pub(crate) fn map_profile_validation(error: &ProfileValidationError) -> Error {
    let (field, code) = match error {
        ProfileValidationError::BioTooLong { .. } => ("bio", "bio_too_long"),
        ProfileValidationError::CountryTooLong { .. } => ("country", "country_too_long"),
        ProfileValidationError::InvalidProfileImageUrl { .. } => {
            ("profileImageUrl", "invalid_profile_image_url")
        }
    };
    field_error(field, code, error.to_string())
}

/// Parse a `{id}` path segment.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| map_user_validation(&err))
}
