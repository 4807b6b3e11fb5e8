//! Course repository port.

use async_trait::async_trait;

use crate::domain::{ApiError, BootcampId, Course, CourseId, ListParams, ListResult};

/// Persistent collection access for courses.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert(&self, course: &Course) -> Result<(), ApiError>;

    /// Replaces the stored course. Returns `NotFound` if the id is unknown.
    async fn update(&self, course: &Course) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, ApiError>;

    /// All courses under a bootcamp. The recomputer reads the full child
    /// set through this method.
    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Course>, ApiError>;

    async fn list(&self, params: &ListParams) -> Result<ListResult<Course>, ApiError>;

    /// Deletes a course. Returns whether a record was removed.
    async fn delete(&self, id: &CourseId) -> Result<bool, ApiError>;

    /// Removes every course under a bootcamp (cascade on bootcamp delete).
    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError>;
}
