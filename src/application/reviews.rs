//! Review CRUD service.
//!
//! Mirrors the course service: every successful mutation triggers a
//! best-effort recompute of the parent bootcamp's `averageRating`.
//! Unlike courses, creating a review does not require owning the parent
//! bootcamp; the store enforces one review per (user, bootcamp) pair.

use std::sync::Arc;

use crate::domain::{
    Actor, AggregateMetric, ApiError, BootcampId, ListParams, ListResult, NewReview,
    OwnershipGuard, Review, ReviewId, ReviewUpdate, Role,
};
use crate::ports::{BootcampRepository, ReviewRepository};

use super::AggregateRecomputer;

/// Fields clients may filter, sort or select on for review lists.
pub const REVIEW_QUERY_FIELDS: &[&str] = &["title", "text", "rating", "createdAt"];

const REVIEW_ROLES: &[Role] = &[Role::User];

/// CRUD operations for reviews of a bootcamp.
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bootcamps: Arc<dyn BootcampRepository>,
    recomputer: Arc<AggregateRecomputer>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        bootcamps: Arc<dyn BootcampRepository>,
        recomputer: Arc<AggregateRecomputer>,
    ) -> Self {
        Self {
            reviews,
            bootcamps,
            recomputer,
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<ListResult<Review>, ApiError> {
        self.reviews.list(params).await
    }

    pub async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Review>, ApiError> {
        self.reviews.find_by_bootcamp(bootcamp).await
    }

    pub async fn get(&self, id: &ReviewId) -> Result<Review, ApiError> {
        self.require_review(id).await
    }

    /// Adds a review. Any `user` (or admin) may review any existing
    /// bootcamp, at most once.
    pub async fn create(
        &self,
        actor: &Actor,
        bootcamp_id: &BootcampId,
        input: NewReview,
    ) -> Result<Review, ApiError> {
        OwnershipGuard::require_role(actor, REVIEW_ROLES)?;

        if self.bootcamps.find_by_id(bootcamp_id).await?.is_none() {
            return Err(ApiError::not_found(format!(
                "Bootcamp not found with id of {}",
                bootcamp_id
            )));
        }

        let review = Review::new(ReviewId::new(), *bootcamp_id, actor.id, input)?;
        self.reviews.insert(&review).await?;

        self.recomputer
            .resync(bootcamp_id, AggregateMetric::AverageRating)
            .await;
        Ok(review)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, ApiError> {
        let mut review = self.require_review(id).await?;
        OwnershipGuard::authorize(actor, review.owner(), REVIEW_ROLES, "review")?;

        review.apply_update(update)?;
        self.reviews.update(&review).await?;

        self.recomputer
            .resync(review.bootcamp(), AggregateMetric::AverageRating)
            .await;
        Ok(review)
    }

    pub async fn delete(&self, actor: &Actor, id: &ReviewId) -> Result<(), ApiError> {
        let review = self.require_review(id).await?;
        OwnershipGuard::authorize(actor, review.owner(), REVIEW_ROLES, "review")?;

        self.reviews.delete(id).await?;

        self.recomputer
            .resync(review.bootcamp(), AggregateMetric::AverageRating)
            .await;
        Ok(())
    }

    async fn require_review(&self, id: &ReviewId) -> Result<Review, ApiError> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Review not found with id of {}", id)))
    }
}
