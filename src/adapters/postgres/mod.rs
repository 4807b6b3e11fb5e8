//! PostgreSQL adapters for the repository ports.
//!
//! Each repository owns its table and translates typed `ListParams` into
//! SQL through the shared filter builder. Unique-constraint violations
//! surface as duplicate-key errors; everything else from the driver maps
//! to a database error.

mod bootcamp_repository;
mod course_repository;
mod filters;
mod review_repository;
mod user_repository;

pub use bootcamp_repository::PgBootcampRepository;
pub use course_repository::PgCourseRepository;
pub use review_repository::PgReviewRepository;
pub use user_repository::PgUserRepository;

use crate::domain::ApiError;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

fn db_err(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return ApiError::duplicate_key();
        }
    }
    ApiError::database(format!("query failed: {}", err))
}
