//! Bcrypt-backed password hashing.

use crate::domain::ApiError;
use crate::ports::PasswordHasher;

/// Hashes passwords with bcrypt at the library default cost.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower costs are useful in tests; production uses `new`.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, ApiError> {
        bcrypt::hash(plain, self.cost)
            .map_err(|err| ApiError::internal(format!("password hashing failed: {}", err)))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, ApiError> {
        bcrypt::verify(plain, hash)
            .map_err(|err| ApiError::internal(format!("password verification failed: {}", err)))
    }
}
