//! HTTP adapter for auth endpoints.

mod dto;
mod handlers;
mod routes;

pub use routes::routes;
