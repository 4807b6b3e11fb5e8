//! Domain layer: entities, value objects, errors and authorization rules.

mod bootcamp;
mod course;
mod errors;
mod guard;
mod ids;
mod query;
mod review;
mod role;
mod user;

pub use bootcamp::{AggregateMetric, Bootcamp, BootcampUpdate, GeoPoint, NewBootcamp};
pub use course::{Course, CourseUpdate, MinimumSkill, NewCourse};
pub use errors::{ApiError, ErrorCode, ValidationError};
pub use guard::{Actor, OwnershipGuard};
pub use ids::{BootcampId, CourseId, ReviewId, UserId};
pub use query::{
    Filter, FilterOp, FilterValue, ListParams, ListResult, PageRef, Pagination, SortKey,
    DEFAULT_LIMIT, DEFAULT_SORT_FIELD,
};
pub use review::{NewReview, Rating, Review, ReviewUpdate};
pub use role::Role;
pub use user::{validate_password, User, MIN_PASSWORD_LEN};
