//! Authentication primitives: credentials, registration payloads, and tokens.
//!
//! Form input is validated by the constructors here before anything is
//! dispatched, so the auth resource client only ever serialises values that
//! already satisfy the client-side rules. Secret material is held in
//! [`Zeroizing`] buffers and never printed.

use std::fmt;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::UserProfile;

/// Minimum password length accepted by the registration form.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Length of the token fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming. It may hold
///   either a username or an email address.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use events_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter22").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username or email used to sign in.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reasons a registration form is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Email is not of the form `local@domain`.
    InvalidEmail,
    /// Password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// The two password fields differ.
    PasswordMismatch,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration form.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `email` is trimmed and has a non-empty local part and domain.
/// - `password1 == password2` and both are at least
///   [`PASSWORD_MIN_LEN`] characters.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    username: String,
    email: String,
    password1: Zeroizing<String>,
    password2: Zeroizing<String>,
    city: String,
}

impl RegistrationPayload {
    /// Validate raw form values.
    ///
    /// # Examples
    /// ```
    /// use events_client::domain::{RegistrationPayload, RegistrationValidationError};
    ///
    /// let err = RegistrationPayload::try_new("ada", "ada@example.com", "password1", "password2", "")
    ///     .unwrap_err();
    /// assert_eq!(err, RegistrationValidationError::PasswordMismatch);
    /// ```
    pub fn try_new(
        username: &str,
        email: &str,
        password1: &str,
        password2: &str,
        city: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationValidationError::EmptyUsername);
        }

        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(RegistrationValidationError::InvalidEmail);
        }

        if password1 != password2 {
            return Err(RegistrationValidationError::PasswordMismatch);
        }

        if password1.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }

        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password1: Zeroizing::new(password1.to_owned()),
            password2: Zeroizing::new(password2.to_owned()),
            city: city.trim().to_owned(),
        })
    }

    /// Chosen username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// First password field.
    pub fn password1(&self) -> &str {
        self.password1.as_str()
    }

    /// Confirmation password field.
    pub fn password2(&self) -> &str {
        self.password2.as_str()
    }

    /// Home city, possibly empty.
    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    /// Credentials for the login that follows a successful registration.
    pub fn login_credentials(&self) -> Result<LoginCredentials, LoginValidationError> {
        LoginCredentials::try_from_parts(&self.username, &self.password1)
    }
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("city", &self.city)
            .finish_non_exhaustive()
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Validated password change form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    new_password1: Zeroizing<String>,
    new_password2: Zeroizing<String>,
}

impl PasswordChange {
    /// Validate the two new-password fields.
    pub fn try_new(
        new_password1: &str,
        new_password2: &str,
    ) -> Result<Self, RegistrationValidationError> {
        if new_password1 != new_password2 {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        if new_password1.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self {
            new_password1: Zeroizing::new(new_password1.to_owned()),
            new_password2: Zeroizing::new(new_password2.to_owned()),
        })
    }

    /// New password.
    pub fn new_password1(&self) -> &str {
        self.new_password1.as_str()
    }

    /// Confirmation of the new password.
    pub fn new_password2(&self) -> &str {
        self.new_password2.as_str()
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}

/// Error returned when a token value is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTokenError;

impl fmt::Display for EmptyTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token must not be empty")
    }
}

impl std::error::Error for EmptyTokenError {}

/// Opaque API token issued by the login endpoint.
///
/// `Debug` and log output only ever show [`AuthToken::fingerprint`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw token value.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyTokenError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyTokenError);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token value, for the `Authorization` header and storage only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Value of the `Authorization` header carrying this token.
    pub fn authorization_value(&self) -> String {
        format!("Token {}", self.expose())
    }

    /// Truncated SHA-256 fingerprint, safe to log.
    ///
    /// # Examples
    /// ```
    /// use events_client::domain::AuthToken;
    ///
    /// let token = AuthToken::new("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b").unwrap();
    /// let fp = token.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(!fp.contains("9944b091"));
    /// ```
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.expose().as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl TryFrom<String> for AuthToken {
    type Error = EmptyTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.fingerprint())
    }
}

/// Successful login response: `{key, user}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    /// Issued token.
    pub key: AuthToken,
    /// Profile of the signed-in user.
    pub user: UserProfile,
}

/// Registration response.
///
/// Depending on server settings the body carries a token, a confirmation
/// notice, or nothing at all. None of it authenticates the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistrationResponse {
    /// Token issued on registration, if the server issues one.
    #[serde(default)]
    pub key: Option<AuthToken>,
    /// Informational message such as "Verification e-mail sent.".
    #[serde(default)]
    pub detail: Option<String>,
}
