//! Application services: use cases composed from domain types and ports.

mod auth_session;
mod bootcamps;
mod courses;
mod recompute;
mod reviews;
mod users;

pub use auth_session::{AuthOutcome, AuthSession, RegisterInput};
pub use bootcamps::{BootcampService, BOOTCAMP_QUERY_FIELDS};
pub use courses::{CourseService, COURSE_QUERY_FIELDS};
pub use recompute::{AggregateRecomputer, RecomputeOutcome};
pub use reviews::{ReviewService, REVIEW_QUERY_FIELDS};
pub use users::{UserAdminService, USER_QUERY_FIELDS};
