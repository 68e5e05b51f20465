//! Authentication primitives: plaintext passwords, stored hashes, and login
//! credentials.
//!
//! Plaintext is held in [`Zeroizing`] buffers and none of these types
//! implement `Serialize`, so secrets cannot leak into cache entries, events,
//! or response bodies.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when credential inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialValidationError {
    /// Email was malformed.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Lower bound on the password length.
        min: usize,
    },
}

/// Plaintext password chosen at registration.
///
/// Caller-provided whitespace is retained.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password against the length policy.
    pub fn new(password: &str) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// One-way password hash as stored in the record store.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already computed hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated login credentials used by authentication.
///
/// ## Invariants
/// - `email` satisfies [`Email`] validation.
/// - `password` is non-empty. Length policy is not applied here so that
///   accounts created under an older policy can still log in.
///
/// # Examples
/// ```
/// use user_graph::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice@example.com ", "hunter22")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_ref(), "alice@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the credential lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("not-an-email", "pw")]
    #[case("alice@localhost", "pw")]
    fn invalid_email_is_rejected(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid email must fail");
        assert!(matches!(err, CredentialValidationError::Email(_)));
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = LoginCredentials::try_from_parts("alice@example.com", "")
            .expect_err("empty password must fail");
        assert_eq!(err, CredentialValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("short")]
    #[case("1234567")]
    fn short_passwords_are_rejected(#[case] password: &str) {
        let err = Password::new(password).expect_err("short password must fail");
        assert_eq!(
            err,
            CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
    }

    #[rstest]
    fn password_keeps_whitespace() {
        let password = Password::new("  spaced out  ").expect("long enough");
        assert_eq!(password.expose(), "  spaced out  ");
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let creds =
            LoginCredentials::try_from_parts("alice@example.com", "hunter22").expect("valid");
        let password = Password::new("hunter22").expect("valid");
        let hash = PasswordHash::new("$2b$12$abcdefghijklmnopqrstuv");

        for rendered in [
            format!("{creds:?}"),
            format!("{password:?}"),
            format!("{hash:?}"),
        ] {
            assert!(!rendered.contains("hunter22"), "leaked: {rendered}");
            assert!(!rendered.contains("$2b$"), "leaked: {rendered}");
        }
    }
}
