//! Routes for course endpoints.

use axum::{routing::get, Router};

use super::super::AppState;
use super::handlers;

/// Flat collection at /api/v1/courses.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list)).route(
        "/:id",
        get(handlers::get)
            .put(handlers::update)
            .delete(handlers::delete),
    )
}

/// Nested collection at /api/v1/bootcamps/:bootcampId/courses.
pub fn nested_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_for_bootcamp).post(handlers::create),
    )
}
