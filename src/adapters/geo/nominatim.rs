//! Zipcode lookup against a Nominatim-compatible HTTP geocoder.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{ApiError, GeoPoint};
use crate::ports::Geocoder;

/// One hit in a Nominatim search response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by the Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_code: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: String, country_code: String) -> Self {
        Self {
            client,
            base_url,
            country_code,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, zipcode: &str) -> Result<GeoPoint, ApiError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("postalcode", zipcode),
                ("countrycodes", &self.country_code),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|err| ApiError::internal(format!("geocoder request failed: {}", err)))?
            .error_for_status()
            .map_err(|err| ApiError::internal(format!("geocoder returned an error: {}", err)))?;

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|err| ApiError::internal(format!("geocoder response unreadable: {}", err)))?;

        let hit = hits.into_iter().next().ok_or_else(|| {
            ApiError::not_found(format!("No location found for zipcode {}", zipcode))
        })?;

        let lat = hit.lat.parse::<f64>();
        let lng = hit.lon.parse::<f64>();
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => Ok(GeoPoint { lat, lng }),
            _ => Err(ApiError::internal("geocoder returned malformed coordinates")),
        }
    }
}
