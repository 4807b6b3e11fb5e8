//! User repository port.

use async_trait::async_trait;

use crate::domain::{ApiError, ListParams, ListResult, User, UserId};

/// Persistent collection access for user accounts.
///
/// # Contract
///
/// Implementations must:
/// - Enforce email uniqueness on insert and update, surfacing violations
///   as `ErrorCode::DuplicateKey`
/// - Return `Ok(None)` (never an error) for lookups that find nothing
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), ApiError>;

    /// Replaces the stored user. Returns `NotFound` if the id is unknown.
    async fn update(&self, user: &User) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Looks up a user by the stored (hashed) reset token.
    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, ApiError>;

    async fn list(&self, params: &ListParams) -> Result<ListResult<User>, ApiError>;

    /// Deletes a user. Returns whether a record was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, ApiError>;
}
