//! HTTP adapters - the REST surface under `/api/v1`.
//!
//! Each resource has its own module with handlers and routes; the shared
//! `AppState` carries the application services and the router below wires
//! everything behind the authentication middleware.

pub mod auth;
pub mod bootcamps;
pub mod courses;
mod envelope;
mod error;
pub mod middleware;
pub mod reviews;
pub mod users;

pub use envelope::Envelope;

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;

use crate::application::{
    AuthSession, BootcampService, CourseService, ReviewService, UserAdminService,
};
use crate::domain::ApiError;

/// Session cookie parameters, resolved from configuration at startup.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub expire_days: i64,
    /// `Secure` attribute; set in production.
    pub secure: bool,
}

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthSession>,
    pub bootcamps: Arc<BootcampService>,
    pub courses: Arc<CourseService>,
    pub reviews: Arc<ReviewService>,
    pub users: Arc<UserAdminService>,
    pub cookie: CookieSettings,
    /// Base URL password-reset links point at.
    pub reset_url_base: String,
}

/// Assembles the full API router.
///
/// Route paths mirror the public API exactly, including the nested
/// `/bootcamps/:id/courses` and `/bootcamps/:id/reviews` collections.
pub fn api_router(state: AppState) -> Router {
    let authenticate =
        axum::middleware::from_fn_with_state(state.auth.clone(), middleware::auth_middleware);

    Router::new()
        .nest("/api/v1/auth", auth::routes())
        .nest("/api/v1/bootcamps", bootcamps::routes())
        .nest("/api/v1/bootcamps/:id/courses", courses::nested_routes())
        .nest("/api/v1/bootcamps/:id/reviews", reviews::nested_routes())
        .nest("/api/v1/courses", courses::routes())
        .nest("/api/v1/reviews", reviews::routes())
        .nest("/api/v1/users", users::routes())
        .layer(authenticate)
        .with_state(state)
}

/// Parses a path id, mapping malformed values to 404 the way a lookup of a
/// nonexistent record would.
fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Resource not found with id of {}", raw)))
}
