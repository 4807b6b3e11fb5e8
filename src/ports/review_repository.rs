//! Review repository port.

use async_trait::async_trait;

use crate::domain::{ApiError, BootcampId, ListParams, ListResult, Review, ReviewId};

/// Persistent collection access for reviews.
///
/// # Contract
///
/// Implementations must enforce the unique (user, bootcamp) pair on insert,
/// surfacing violations as `ErrorCode::DuplicateKey`.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<(), ApiError>;

    /// Replaces the stored review. Returns `NotFound` if the id is unknown.
    async fn update(&self, review: &Review) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ApiError>;

    /// All reviews under a bootcamp. The recomputer reads the full child
    /// set through this method.
    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Review>, ApiError>;

    async fn list(&self, params: &ListParams) -> Result<ListResult<Review>, ApiError>;

    /// Deletes a review. Returns whether a record was removed.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ApiError>;

    /// Removes every review under a bootcamp (cascade on bootcamp delete).
    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError>;
}
