//! Adapters - concrete implementations of the ports plus the HTTP surface.

pub mod email;
pub mod geo;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod security;
pub mod storage;
