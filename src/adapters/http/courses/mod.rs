//! HTTP adapter for course endpoints.

mod handlers;
mod routes;

pub use routes::{nested_routes, routes};
