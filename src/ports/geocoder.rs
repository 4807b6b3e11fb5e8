//! Geocoding port for the radius endpoint. Lookup implementation is an
//! external collaborator.

use async_trait::async_trait;

use crate::domain::{ApiError, GeoPoint};

/// Resolves a postal code to a geographic point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns `NotFound` when the zipcode cannot be resolved.
    async fn geocode(&self, zipcode: &str) -> Result<GeoPoint, ApiError>;
}
