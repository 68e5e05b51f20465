//! Registration input and partial profile updates.

use thiserror::Error;

use super::auth::Password;
use super::user::{DisplayName, Email, Username};

/// Maximum length of a biography.
pub const BIO_MAX: usize = 500;
/// Maximum length of a country value.
pub const COUNTRY_MAX: usize = 64;
/// Maximum length of a profile image URL.
pub const PROFILE_IMAGE_URL_MAX: usize = 2048;

/// Validation errors for optional profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    /// Biography exceeded [`BIO_MAX`].
    #[error("bio must be at most {max} characters")]
    BioTooLong {
        /// Upper bound on the biography length.
        max: usize,
    },
    /// Country exceeded [`COUNTRY_MAX`].
    #[error("country must be at most {max} characters")]
    CountryTooLong {
        /// Upper bound on the country length.
        max: usize,
    },
    /// Image URL was too long or not `http(s)`.
    #[error("profile image URL must be an http(s) URL of at most {max} characters")]
    InvalidProfileImageUrl {
        /// Upper bound on the URL length.
        max: usize,
    },
}

/// Validate an optional country value.
pub fn validate_country(country: Option<String>) -> Result<Option<String>, ProfileValidationError> {
    match country {
        Some(value) if value.chars().count() > COUNTRY_MAX => {
            Err(ProfileValidationError::CountryTooLong { max: COUNTRY_MAX })
        }
        other => Ok(other),
    }
}

fn validate_bio(bio: Option<String>) -> Result<Option<String>, ProfileValidationError> {
    match bio {
        Some(value) if value.chars().count() > BIO_MAX => {
            Err(ProfileValidationError::BioTooLong { max: BIO_MAX })
        }
        other => Ok(other),
    }
}

fn validate_image_url(url: Option<String>) -> Result<Option<String>, ProfileValidationError> {
    let Some(value) = url else {
        return Ok(None);
    };
    let scheme_ok = value.starts_with("https://") || value.starts_with("http://");
    if !scheme_ok || value.chars().count() > PROFILE_IMAGE_URL_MAX {
        return Err(ProfileValidationError::InvalidProfileImageUrl {
            max: PROFILE_IMAGE_URL_MAX,
        });
    }
    Ok(Some(value))
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login email; must be unused.
    pub email: Email,
    /// Public handle; must be unused.
    pub username: Username,
    /// Initial display name.
    pub display_name: DisplayName,
    /// Plaintext password, hashed before anything is written.
    pub password: Password,
    /// Optional country.
    pub country: Option<String>,
    /// Whether the account is registered as an artist.
    pub is_artist: bool,
}

/// Partial profile update with "keep current value if absent" semantics.
///
/// `None` leaves the stored value untouched. There is no way to clear a
/// field back to empty through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    display_name: Option<DisplayName>,
    bio: Option<String>,
    country: Option<String>,
    profile_image_url: Option<String>,
}

impl ProfilePatch {
    /// Build a patch, validating each present field.
    pub fn new(
        display_name: Option<DisplayName>,
        bio: Option<String>,
        country: Option<String>,
        profile_image_url: Option<String>,
    ) -> Result<Self, ProfileValidationError> {
        Ok(Self {
            display_name,
            bio: validate_bio(bio)?,
            country: validate_country(country)?,
            profile_image_url: validate_image_url(profile_image_url)?,
        })
    }

    /// New display name, if present.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// New biography, if present.
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// New country, if present.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// New profile image URL, if present.
    pub fn profile_image_url(&self) -> Option<&str> {
        self.profile_image_url.as_deref()
    }

    /// `true` when no field is present.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bio.is_none()
            && self.country.is_none()
            && self.profile_image_url.is_none()
    }
}
