use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered account. The email is the unique login key.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of an account. Not unique and never used for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a username from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Must parse as an RFC 5322 address and have the `local@domain.tld` shape:
/// word characters, `.` and `-` on both sides of the `@`, and a top-level
/// domain of at least two ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MIN_TLD_LENGTH: usize = 2;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `InvalidFormat` - Not an address of the accepted shape
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.trim().is_empty() {
            return Err(EmailError::Blank);
        }

        email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        Self::with_valid_shape(email).map(Self)
    }

    fn with_valid_shape(email: String) -> Result<String, EmailError> {
        let Some((local, domain)) = email.rsplit_once('@') else {
            return Err(EmailError::InvalidFormat("missing '@'".to_string()));
        };

        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
        if !local.chars().all(allowed) || !domain.chars().all(allowed) {
            return Err(EmailError::InvalidFormat(
                "unsupported characters".to_string(),
            ));
        }

        let valid_tld = domain.rsplit_once('.').is_some_and(|(host, tld)| {
            !host.is_empty()
                && tld.len() >= Self::MIN_TLD_LENGTH
                && tld.chars().all(|c| c.is_ascii_alphabetic())
        });
        if !valid_tld {
            return Err(EmailError::InvalidFormat(
                "domain must end with a top-level domain".to_string(),
            ));
        }

        Ok(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password in transit. Never persisted, never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 8;

    /// Accept any non-blank password (login).
    ///
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        Ok(Self(password))
    }

    /// Accept a password meeting the registration policy.
    ///
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooShort` - Fewer than 8 characters
    pub fn for_registration(password: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::new(password)?;
        let length = password.0.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(username: Username, email: EmailAddress, password: Password) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

/// Command to log in with an email and password
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}

/// Successful login: the account and its freshly issued access token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}
