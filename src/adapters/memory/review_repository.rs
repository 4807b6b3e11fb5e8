//! In-memory implementation of ReviewRepository.

use async_trait::async_trait;
use std::sync::RwLock;

use super::filtering::select_page;
use super::poisoned;
use crate::domain::{ApiError, BootcampId, ListParams, ListResult, Review, ReviewId};
use crate::ports::ReviewRepository;

/// In-memory review store. Backs tests and local runs without a database.
#[derive(Default)]
pub struct MemoryReviewRepository {
    reviews: RwLock<Vec<Review>>,
}

impl MemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        let mut reviews = self.reviews.write().map_err(poisoned)?;
        // Unique (user, bootcamp) pair.
        if reviews
            .iter()
            .any(|r| r.owner() == review.owner() && r.bootcamp() == review.bootcamp())
        {
            return Err(ApiError::duplicate_key());
        }
        reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), ApiError> {
        let mut reviews = self.reviews.write().map_err(poisoned)?;
        match reviews.iter_mut().find(|r| r.id() == review.id()) {
            Some(existing) => {
                *existing = review.clone();
                Ok(())
            }
            None => Err(ApiError::not_found("No review found")),
        }
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ApiError> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        Ok(reviews.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Review>, ApiError> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        Ok(reviews
            .iter()
            .filter(|r| r.bootcamp() == bootcamp)
            .cloned()
            .collect())
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Review>, ApiError> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        Ok(select_page(&reviews, params))
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ApiError> {
        let mut reviews = self.reviews.write().map_err(poisoned)?;
        let before = reviews.len();
        reviews.retain(|r| r.id() != id);
        Ok(reviews.len() < before)
    }

    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError> {
        let mut reviews = self.reviews.write().map_err(poisoned)?;
        let before = reviews.len();
        reviews.retain(|r| r.bootcamp() != bootcamp);
        Ok((before - reviews.len()) as u64)
    }
}
