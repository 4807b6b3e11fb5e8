//! HTTP handlers for bootcamp endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::BOOTCAMP_QUERY_FIELDS;
use crate::domain::{ApiError, BootcampId, BootcampUpdate, ListParams, NewBootcamp};

use super::super::middleware::RequireAuth;
use super::super::{parse_id, AppState, Envelope};

/// GET /api/v1/bootcamps
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope>, ApiError> {
    let params = ListParams::parse(&pairs, BOOTCAMP_QUERY_FIELDS)?;
    let result = state.bootcamps.list(&params).await?;
    Ok(Json(Envelope::page(&result, &params)?))
}

/// GET /api/v1/bootcamps/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: BootcampId = parse_id(&id)?;
    let bootcamp = state.bootcamps.get(&id).await?;
    Ok(Json(Envelope::data(&bootcamp)?))
}

/// POST /api/v1/bootcamps
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(input): Json<NewBootcamp>,
) -> Result<Response, ApiError> {
    let bootcamp = state.bootcamps.create(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(&bootcamp)?)).into_response())
}

/// PUT /api/v1/bootcamps/:id
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(input): Json<BootcampUpdate>,
) -> Result<Json<Envelope>, ApiError> {
    let id: BootcampId = parse_id(&id)?;
    let bootcamp = state.bootcamps.update(&actor, &id, input).await?;
    Ok(Json(Envelope::data(&bootcamp)?))
}

/// DELETE /api/v1/bootcamps/:id
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: BootcampId = parse_id(&id)?;
    state.bootcamps.delete(&actor, &id).await?;
    Ok(Json(Envelope::empty()))
}

/// GET /api/v1/bootcamps/radius/:zipcode/:distance
pub async fn within_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let distance: f64 = distance
        .parse()
        .map_err(|_| ApiError::bad_request("Distance must be a positive number"))?;

    let found = state.bootcamps.within_radius(&zipcode, distance).await?;
    Ok(Json(Envelope::collection(&found)?))
}

/// PUT /api/v1/bootcamps/:id/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Envelope>, ApiError> {
    let id: BootcampId = parse_id(&id)?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Please upload a file"))?;

    let bootcamp = state
        .bootcamps
        .upload_photo(&actor, &id, content_type, &body)
        .await?;
    Ok(Json(Envelope::data(&bootcamp)?))
}
