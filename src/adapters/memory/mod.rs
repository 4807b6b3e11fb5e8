//! In-memory adapters - store implementations without a database.
//!
//! Used by the integration tests and available for local development runs.

mod bootcamp_repository;
mod course_repository;
mod filtering;
mod review_repository;
mod user_repository;

pub use bootcamp_repository::MemoryBootcampRepository;
pub use course_repository::MemoryCourseRepository;
pub use review_repository::MemoryReviewRepository;
pub use user_repository::MemoryUserRepository;

use crate::domain::ApiError;

/// Maps a poisoned lock to a generic store failure.
fn poisoned<T>(_: std::sync::PoisonError<T>) -> ApiError {
    ApiError::internal("In-memory store lock poisoned")
}
