use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;

use super::errors::SigningKeyError;

/// Symmetric secret used to sign and verify tokens (HS256).
///
/// Built once at start-up and handed to the codec. Tokens signed with one
/// key cannot be verified with another, so a generated key invalidates
/// every outstanding token when the process restarts.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Smallest accepted secret (256 bits, the HS256 block strength).
    pub const MIN_LENGTH: usize = 32;

    const GENERATED_LENGTH: usize = 64;

    /// Generate a random key from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; Self::GENERATED_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Use an operator supplied secret.
    ///
    /// # Errors
    /// * `TooShort` - Secret shorter than 32 bytes
    pub fn from_secret(secret: &[u8]) -> Result<Self, SigningKeyError> {
        if secret.len() < Self::MIN_LENGTH {
            return Err(SigningKeyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self(secret.to_vec()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"<redacted>").finish()
    }
}
