//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `DEVCAMPER` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use devcamper::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod email;
mod error;
mod geocoder;
mod server;
mod uploads;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use geocoder::GeocoderConfig;
pub use server::{Environment, ServerConfig};
pub use uploads::UploadConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration (JWT signing, cookie)
    pub auth: AuthConfig,

    /// File upload configuration
    #[serde(default)]
    pub uploads: UploadConfig,

    /// Email configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Geocoder configuration
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `DEVCAMPER` prefix where `__` separates nested values:
    ///
    /// - `DEVCAMPER__SERVER__PORT=5000` -> `server.port = 5000`
    /// - `DEVCAMPER__DATABASE__URL=...` -> `database.url = ...`
    /// - `DEVCAMPER__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DEVCAMPER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.uploads.validate()?;
        self.email.validate()?;
        self.geocoder.validate()?;
        Ok(())
    }
}
