use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;
use super::key::SigningKey;

/// Issues and verifies HS256 signed access tokens.
///
/// Tokens are compact JWS strings (`header.claims.signature`, each segment
/// base64url). Nothing is stored server side: a token is valid while its
/// signature matches this codec's key and the clock is before `exp`, and
/// there is no way to invalidate it earlier.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    structure: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec that reads the wall clock.
    pub fn new(key: &SigningKey) -> Self {
        Self::with_clock(key, Arc::new(SystemClock))
    }

    /// Create a codec with an explicit time source.
    pub fn with_clock(key: &SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is checked against `clock` after the signature, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        // Decodes header and claims without touching the signature.
        let mut structure = validation.clone();
        structure.insecure_disable_signature_validation();

        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
            structure,
            clock,
        }
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `InvalidTtl` - `ttl` is zero, negative, or past the representable range
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_with_claims(subject, ttl).map(|(token, _)| token)
    }

    /// Same as [`TokenCodec::issue`], also returning the signed claims.
    pub fn issue_with_claims(
        &self,
        subject: &str,
        ttl: Duration,
    ) -> Result<(String, Claims), TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }

        let claims = Claims::new(subject, self.clock.now(), ttl).ok_or(TokenError::InvalidTtl)?;

        let token = encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify a token and return its claims.
    ///
    /// Checks run in order: structure, signature, expiry.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be split, base64-decoded or parsed
    /// * `BadSignature` - Signature does not match or algorithm is not HS256
    /// * `Expired` - Current time is at or past `exp`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // The signature check in `decode` runs before the payload is parsed,
        // so structure is established first.
        decode::<Claims>(token, &self.decoding_key, &self.structure)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
