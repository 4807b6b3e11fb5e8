//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (JWT signing and session cookie)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to sign bearer tokens
    pub jwt_secret: String,

    /// Bearer token lifetime in days
    #[serde(default = "default_jwt_expire_days")]
    pub jwt_expire_days: i64,

    /// Session cookie lifetime in days
    #[serde(default = "default_cookie_expire_days")]
    pub cookie_expire_days: i64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes; development
    /// accepts any non-empty value.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production && self.jwt_secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.jwt_expire_days <= 0 || self.cookie_expire_days <= 0 {
            return Err(ValidationError::InvalidTokenExpiry);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expire_days: default_jwt_expire_days(),
            cookie_expire_days: default_cookie_expire_days(),
        }
    }
}

fn default_jwt_expire_days() -> i64 {
    30
}

fn default_cookie_expire_days() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_missing_secret() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_production_requires_long_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(config.validate(&Environment::Production).is_err());
    }

    #[test]
    fn test_validation_rejects_nonpositive_expiry() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(32),
            jwt_expire_days: 0,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }
}
