//! Geocoder configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Geocoder configuration (Nominatim-compatible HTTP service)
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the geocoding service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Country restriction for postal-code lookups
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl GeocoderConfig {
    /// Validate geocoder configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidGeocoderUrl);
        }
        Ok(())
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country_code: default_country_code(),
        }
    }
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_country_code() -> String {
    "us".to_string()
}
