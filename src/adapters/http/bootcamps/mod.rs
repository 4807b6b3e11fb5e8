//! HTTP adapter for bootcamp endpoints.

mod handlers;
mod routes;

pub use routes::routes;
