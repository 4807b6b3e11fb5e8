//! JWT bearer credentials signed with HMAC-SHA256.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiError, UserId};
use crate::ports::TokenService;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the credential is bound to.
    sub: String,
    /// Expiry as a unix timestamp.
    exp: i64,
    /// Issued-at as a unix timestamp.
    iat: i64,
}

/// Signs and validates bearer tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expire: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, expire_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expire: Duration::days(expire_days),
        }
    }
}

impl TokenService for JwtTokenService {
    fn sign(&self, user_id: &UserId) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.expire).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ApiError::internal(format!("token signing failed: {}", err)))
    }

    fn verify(&self, token: &str) -> Result<UserId, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))?;

        data.claims
            .sub
            .parse()
            .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))
    }
}
