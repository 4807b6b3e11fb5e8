//! Geocoding adapters.

mod nominatim;

pub use nominatim::NominatimGeocoder;
