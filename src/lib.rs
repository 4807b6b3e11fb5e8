//! DevCamper - Bootcamp directory REST API
//!
//! This crate exposes CRUD endpoints for bootcamps, courses, reviews and
//! users over a document-style store, with ownership-based authorization
//! and derived aggregate fields kept in sync by a recomputation service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
