//! Bootcamp repository port.

use async_trait::async_trait;

use crate::domain::{
    AggregateMetric, ApiError, Bootcamp, BootcampId, GeoPoint, ListParams, ListResult, UserId,
};

/// Persistent collection access for bootcamp listings.
#[async_trait]
pub trait BootcampRepository: Send + Sync {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), ApiError>;

    /// Replaces the stored listing. Returns `NotFound` if the id is unknown.
    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, ApiError>;

    /// Finds the bootcamp owned by `owner`, if any. Backs the
    /// one-bootcamp-per-publisher cap.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, ApiError>;

    async fn list(&self, params: &ListParams) -> Result<ListResult<Bootcamp>, ApiError>;

    /// All bootcamps whose stored location lies within `radius_miles` of
    /// `center`.
    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_miles: f64,
    ) -> Result<Vec<Bootcamp>, ApiError>;

    /// Writes a single derived field without touching any other column.
    ///
    /// Returns `false` when the bootcamp no longer exists; the recomputer
    /// treats that as a no-op rather than an error.
    async fn set_aggregate(
        &self,
        id: &BootcampId,
        metric: AggregateMetric,
        value: f64,
    ) -> Result<bool, ApiError>;

    /// Records the uploaded photo filename via a targeted partial update.
    async fn set_photo(&self, id: &BootcampId, filename: &str) -> Result<bool, ApiError>;

    /// Deletes a bootcamp. Returns whether a record was removed.
    async fn delete(&self, id: &BootcampId) -> Result<bool, ApiError>;
}
