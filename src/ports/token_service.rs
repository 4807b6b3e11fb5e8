//! Bearer-token signing port.

use crate::domain::{ApiError, UserId};

/// Issues and verifies the opaque bearer credentials bound to a user id
/// and an expiry.
///
/// # Contract
///
/// `verify` must reject tampered and expired tokens with
/// `ErrorCode::Unauthorized`; it resolves only the user id, never a cached
/// copy of the user record.
pub trait TokenService: Send + Sync {
    /// Signs a credential for `user_id` with the configured expiry.
    fn sign(&self, user_id: &UserId) -> Result<String, ApiError>;

    /// Validates signature and expiry, returning the bound user id.
    fn verify(&self, token: &str) -> Result<UserId, ApiError>;
}
