//! HTTP handlers for review endpoints, both the flat collection and the
//! nested one under a bootcamp.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::REVIEW_QUERY_FIELDS;
use crate::domain::{ApiError, BootcampId, ListParams, NewReview, ReviewId, ReviewUpdate};

use super::super::middleware::RequireAuth;
use super::super::{parse_id, AppState, Envelope};

/// GET /api/v1/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope>, ApiError> {
    let params = ListParams::parse(&pairs, REVIEW_QUERY_FIELDS)?;
    let result = state.reviews.list(&params).await?;
    Ok(Json(Envelope::page(&result, &params)?))
}

/// GET /api/v1/bootcamps/:bootcampId/reviews
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let bootcamp_id: BootcampId = parse_id(&bootcamp_id)?;
    let reviews = state.reviews.list_for_bootcamp(&bootcamp_id).await?;
    Ok(Json(Envelope::collection(&reviews)?))
}

/// GET /api/v1/reviews/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: ReviewId = parse_id(&id)?;
    let review = state.reviews.get(&id).await?;
    Ok(Json(Envelope::data(&review)?))
}

/// POST /api/v1/bootcamps/:bootcampId/reviews
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(bootcamp_id): Path<String>,
    Json(input): Json<NewReview>,
) -> Result<Response, ApiError> {
    let bootcamp_id: BootcampId = parse_id(&bootcamp_id)?;
    let review = state.reviews.create(&actor, &bootcamp_id, input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(&review)?)).into_response())
}

/// PUT /api/v1/reviews/:id
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(input): Json<ReviewUpdate>,
) -> Result<Json<Envelope>, ApiError> {
    let id: ReviewId = parse_id(&id)?;
    let review = state.reviews.update(&actor, &id, input).await?;
    Ok(Json(Envelope::data(&review)?))
}

/// DELETE /api/v1/reviews/:id
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: ReviewId = parse_id(&id)?;
    state.reviews.delete(&actor, &id).await?;
    Ok(Json(Envelope::empty()))
}
