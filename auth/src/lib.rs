//! Authentication utilities library
//!
//! Provides the stateless building blocks for bearer-token authentication:
//! - Password hashing (Argon2id)
//! - Signed access tokens (HS256 JWT) with an injectable clock
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{SigningKey, TokenCodec};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(&SigningKey::generate());
//! let token = codec.issue("alice@example.com", Duration::hours(24)).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.subject(), "alice@example.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SigningKey};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(&SigningKey::generate(), Duration::hours(24));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "alice@example.com").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.subject(), "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::DEFAULT_TOKEN_TTL_HOURS;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::FixedClock;
pub use jwt::SigningKey;
pub use jwt::SigningKeyError;
pub use jwt::SystemClock;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
