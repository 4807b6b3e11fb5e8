//! HTTP handlers for user administration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::USER_QUERY_FIELDS;
use crate::domain::{ApiError, ListParams, Role, UserId};

use super::super::middleware::RequireAuth;
use super::super::{parse_id, AppState, Envelope};
use super::dto::{CreateUserRequest, UpdateUserRequest};

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope>, ApiError> {
    let params = ListParams::parse(&pairs, USER_QUERY_FIELDS)?;
    let result = state.users.list(&actor, &params).await?;
    Ok(Json(Envelope::page(&result, &params)?))
}

/// GET /api/v1/users/:id
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: UserId = parse_id(&id)?;
    let user = state.users.get(&actor, &id).await?;
    Ok(Json(Envelope::data(&user)?))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users
        .create(
            &actor,
            req.name,
            req.email,
            req.password,
            req.role.unwrap_or(Role::User),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(&user)?)).into_response())
}

/// PUT /api/v1/users/:id
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Envelope>, ApiError> {
    let id: UserId = parse_id(&id)?;
    let user = state
        .users
        .update(&actor, &id, req.name, req.email, req.role, req.password)
        .await?;
    Ok(Json(Envelope::data(&user)?))
}

/// DELETE /api/v1/users/:id
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id: UserId = parse_id(&id)?;
    state.users.delete(&actor, &id).await?;
    Ok(Json(Envelope::empty()))
}
