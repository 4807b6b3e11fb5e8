//! Password hashing port.

use crate::domain::ApiError;

/// One-way password hashing.
///
/// Plaintext passwords exist only between the HTTP boundary and this port;
/// after `hash` they are never stored or compared directly.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    fn hash(&self, plain: &str) -> Result<String, ApiError>;

    /// Verifies a plaintext password against a stored hash.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, ApiError>;
}
