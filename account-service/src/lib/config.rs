use std::env;

use auth::SigningKey;
use auth::SigningKeyError;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Shared signing secret. When absent a random key is generated at start-up.
    #[serde(default)]
    pub secret: Option<String>,
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Longest accepted token lifetime (one year).
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

    /// Token lifetime from `expiration_hours`.
    ///
    /// # Errors
    /// * `Message` - Hours not in `1..=MAX_EXPIRATION_HOURS`
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        if !(1..=Self::MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}, got {}",
                Self::MAX_EXPIRATION_HOURS,
                self.expiration_hours
            )));
        }
        Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours out of range: {}",
                self.expiration_hours
            ))
        })
    }

    /// Build the process-wide signing key.
    ///
    /// # Errors
    /// * `TooShort` - Configured secret shorter than 32 bytes
    pub fn signing_key(&self) -> Result<SigningKey, SigningKeyError> {
        match &self.secret {
            Some(secret) => SigningKey::from_secret(secret.as_bytes()),
            None => Ok(SigningKey::generate()),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (port 8080, 24 hour tokens)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("jwt.expiration_hours", auth::DEFAULT_TOKEN_TTL_HOURS)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__EXPIRATION_HOURS=1 overrides jwt.expiration_hours
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.token_ttl()?;
        if let Some(secret) = &self.jwt.secret {
            if secret.len() < SigningKey::MIN_LENGTH {
                return Err(ConfigError::Message(format!(
                    "jwt.secret must be at least {} bytes",
                    SigningKey::MIN_LENGTH
                )));
            }
        }
        Ok(())
    }
}
