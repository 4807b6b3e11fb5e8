//! In-memory implementation of BootcampRepository.

use async_trait::async_trait;
use std::sync::RwLock;

use super::filtering::select_page;
use super::poisoned;
use crate::domain::{
    AggregateMetric, ApiError, Bootcamp, BootcampId, GeoPoint, ListParams, ListResult, UserId,
};
use crate::ports::BootcampRepository;

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// In-memory bootcamp store. Backs tests and local runs without a database.
#[derive(Default)]
pub struct MemoryBootcampRepository {
    bootcamps: RwLock<Vec<Bootcamp>>,
}

impl MemoryBootcampRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BootcampRepository for MemoryBootcampRepository {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), ApiError> {
        let mut bootcamps = self.bootcamps.write().map_err(poisoned)?;
        bootcamps.push(bootcamp.clone());
        Ok(())
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), ApiError> {
        let mut bootcamps = self.bootcamps.write().map_err(poisoned)?;
        match bootcamps.iter_mut().find(|b| b.id() == bootcamp.id()) {
            Some(existing) => {
                *existing = bootcamp.clone();
                Ok(())
            }
            None => Err(ApiError::not_found("No bootcamp found")),
        }
    }

    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, ApiError> {
        let bootcamps = self.bootcamps.read().map_err(poisoned)?;
        Ok(bootcamps.iter().find(|b| b.id() == id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, ApiError> {
        let bootcamps = self.bootcamps.read().map_err(poisoned)?;
        Ok(bootcamps.iter().find(|b| b.owner() == owner).cloned())
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Bootcamp>, ApiError> {
        let bootcamps = self.bootcamps.read().map_err(poisoned)?;
        Ok(select_page(&bootcamps, params))
    }

    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_miles: f64,
    ) -> Result<Vec<Bootcamp>, ApiError> {
        let bootcamps = self.bootcamps.read().map_err(poisoned)?;
        Ok(bootcamps
            .iter()
            .filter(|b| match b.location() {
                Some(loc) => haversine_miles(center, loc) <= radius_miles,
                None => false,
            })
            .cloned()
            .collect())
    }

    async fn set_aggregate(
        &self,
        id: &BootcampId,
        metric: AggregateMetric,
        value: f64,
    ) -> Result<bool, ApiError> {
        let mut bootcamps = self.bootcamps.write().map_err(poisoned)?;
        match bootcamps.iter_mut().find(|b| b.id() == id) {
            Some(bootcamp) => {
                match metric {
                    AggregateMetric::AverageCost => bootcamp.set_average_cost(value),
                    AggregateMetric::AverageRating => bootcamp.set_average_rating(value),
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_photo(&self, id: &BootcampId, filename: &str) -> Result<bool, ApiError> {
        let mut bootcamps = self.bootcamps.write().map_err(poisoned)?;
        match bootcamps.iter_mut().find(|b| b.id() == id) {
            Some(bootcamp) => {
                bootcamp.set_photo(filename.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &BootcampId) -> Result<bool, ApiError> {
        let mut bootcamps = self.bootcamps.write().map_err(poisoned)?;
        let before = bootcamps.len();
        bootcamps.retain(|b| b.id() != id);
        Ok(bootcamps.len() < before)
    }
}

/// Great-circle distance between two points in miles.
fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
