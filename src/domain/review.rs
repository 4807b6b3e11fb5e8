//! Review entity. A user may review a given bootcamp at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BootcampId, ReviewId, UserId, ValidationError};

/// A review rating, an integer between 1 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    /// Creates a rating, validating the range.
    pub fn new(value: i32) -> Result<Self, ApiError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range("rating", Self::MIN, Self::MAX, value).into());
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Client-supplied fields for creating a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub title: String,
    pub text: String,
    pub rating: i32,
}

/// Client-supplied partial update for a review.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}

/// A review of a bootcamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: ReviewId,
    bootcamp: BootcampId,
    user: UserId,
    title: String,
    text: String,
    rating: Rating,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review of `bootcamp`, owned by `user`.
    pub fn new(
        id: ReviewId,
        bootcamp: BootcampId,
        user: UserId,
        input: NewReview,
    ) -> Result<Self, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        if input.text.trim().is_empty() {
            return Err(ValidationError::empty_field("text").into());
        }

        Ok(Self {
            id,
            bootcamp,
            user,
            title: input.title,
            text: input.text,
            rating: Rating::new(input.rating)?,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a review from stored state. No validation is applied.
    pub fn from_storage(
        id: ReviewId,
        bootcamp: BootcampId,
        user: UserId,
        title: String,
        text: String,
        rating: Rating,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            bootcamp,
            user,
            title,
            text,
            rating,
            created_at,
        }
    }

    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    /// The parent bootcamp this review belongs to.
    pub fn bootcamp(&self) -> &BootcampId {
        &self.bootcamp
    }

    /// The immutable owner set at creation.
    pub fn owner(&self) -> &UserId {
        &self.user
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a client update. Parent and owner are untouchable.
    pub fn apply_update(&mut self, update: ReviewUpdate) -> Result<(), ApiError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::empty_field("title").into());
            }
            self.title = title;
        }
        if let Some(text) = update.text {
            if text.trim().is_empty() {
                return Err(ValidationError::empty_field("text").into());
            }
            self.text = text;
        }
        if let Some(rating) = update.rating {
            self.rating = Rating::new(rating)?;
        }
        Ok(())
    }
}
