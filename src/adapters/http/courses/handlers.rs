//! HTTP handlers for course endpoints, both the flat collection and the
//! nested one under a bootcamp.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::COURSE_QUERY_FIELDS;
use crate::domain::{ApiError, BootcampId, CourseId, CourseUpdate, ListParams, NewCourse};

use super::super::middleware::RequireAuth;
use super::super::{parse_id, AppState, Envelope};

/// GET /api/v1/courses
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope>, ApiError> {
    let params = ListParams::parse(&pairs, COURSE_QUERY_FIELDS)?;
    let result = state.courses.list(&params).await?;
    Ok(Json(Envelope::page(&result, &params)?))
}

/// GET /api/v1/bootcamps/:bootcampId/courses
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let bootcamp_id: BootcampId = parse_id(&bootcamp_id)?;
    let courses = state.courses.list_for_bootcamp(&bootcamp_id).await?;
    Ok(Json(Envelope::collection(&courses)?))
}

/// GET /api/v1/courses/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    let course = state.courses.get(&id).await?;
    Ok(Json(Envelope::data(&course)?))
}

/// POST /api/v1/bootcamps/:bootcampId/courses
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(bootcamp_id): Path<String>,
    Json(input): Json<NewCourse>,
) -> Result<Response, ApiError> {
    let bootcamp_id: BootcampId = parse_id(&bootcamp_id)?;
    let course = state.courses.create(&actor, &bootcamp_id, input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(&course)?)).into_response())
}

/// PUT /api/v1/courses/:id
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(input): Json<CourseUpdate>,
) -> Result<Json<Envelope>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    let course = state.courses.update(&actor, &id, input).await?;
    Ok(Json(Envelope::data(&course)?))
}

/// DELETE /api/v1/courses/:id
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    state.courses.delete(&actor, &id).await?;
    Ok(Json(Envelope::empty()))
}
