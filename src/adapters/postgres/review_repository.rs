//! PostgreSQL review repository.
//!
//! The unique (user_id, bootcamp_id) index enforces the one-review-per-
//! bootcamp rule; violations map to duplicate-key errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{
    ApiError, BootcampId, ListParams, ListResult, Rating, Review, ReviewId, UserId,
};
use crate::ports::ReviewRepository;

use super::db_err;
use super::filters::{push_order, push_where, push_window, Column, ColumnMap};

const COLUMNS: ColumnMap = &[
    ("title", Column::Scalar("title")),
    ("text", Column::Scalar("text")),
    ("rating", Column::Scalar("rating")),
    ("createdAt", Column::Scalar("created_at")),
];

const SELECT: &str =
    "SELECT id, bootcamp_id, user_id, title, text, rating, created_at FROM reviews";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    bootcamp_id: Uuid,
    user_id: Uuid,
    title: String,
    text: String,
    rating: i32,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Result<Review, ApiError> {
        Ok(Review::from_storage(
            ReviewId::from_uuid(self.id),
            BootcampId::from_uuid(self.bootcamp_id),
            UserId::from_uuid(self.user_id),
            self.title,
            self.text,
            Rating::new(self.rating)?,
            self.created_at,
        ))
    }
}

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO reviews (id, bootcamp_id, user_id, title, text, rating, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(review.id().as_uuid())
        .bind(review.bootcamp().as_uuid())
        .bind(review.owner().as_uuid())
        .bind(review.title())
        .bind(review.text())
        .bind(review.rating().value())
        .bind(review.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), ApiError> {
        let result =
            sqlx::query("UPDATE reviews SET title = $2, text = $3, rating = $4 WHERE id = $1")
                .bind(review.id().as_uuid())
                .bind(review.title())
                .bind(review.text())
                .bind(review.rating().value())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!(
                "Review not found with id of {}",
                review.id()
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ApiError> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(ReviewRow::into_review).transpose()
    }

    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Review>, ApiError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "{} WHERE bootcamp_id = $1 ORDER BY created_at DESC",
            SELECT
        ))
        .bind(bootcamp.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(ReviewRow::into_review).collect()
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Review>, ApiError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reviews");
        push_where(&mut count, &params.filters, COLUMNS)?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT);
        push_where(&mut query, &params.filters, COLUMNS)?;
        push_order(&mut query, &params.sort, COLUMNS)?;
        push_window(&mut query, params);

        let rows: Vec<ReviewRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(ListResult {
            items: rows
                .into_iter()
                .map(ReviewRow::into_review)
                .collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM reviews WHERE bootcamp_id = $1")
            .bind(bootcamp.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
