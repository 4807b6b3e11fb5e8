//! Routes for bootcamp endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::super::AppState;
use super::handlers;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route("/radius/:zipcode/:distance", get(handlers::within_radius))
        .route("/:id/photo", put(handlers::upload_photo))
        .route(
            "/:id",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
}
