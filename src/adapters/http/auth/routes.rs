//! Routes for auth endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::super::AppState;
use super::handlers;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/me", get(handlers::me))
        .route("/updatedetails", put(handlers::update_details))
        .route("/changepassword", put(handlers::change_password))
        .route("/forgotpassword", post(handlers::forgot_password))
        .route("/resetpassword/:resetToken", put(handlers::reset_password))
}
