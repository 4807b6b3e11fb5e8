//! HTTP adapter for review endpoints.

mod handlers;
mod routes;

pub use routes::{nested_routes, routes};
