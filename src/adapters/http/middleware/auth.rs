//! Authentication middleware and extractors.
//!
//! The middleware validates Bearer tokens through the session service and
//! injects the resolved `User` and an `Actor` into request extensions.
//! Requests without a token pass through untouched; handlers opt in to
//! authentication with the `RequireAuth` and `CurrentUser` extractors.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::AuthSession;
use crate::domain::{Actor, ApiError, User};

/// Auth middleware state.
pub type AuthState = Arc<AuthSession>;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Validates a Bearer token when present and injects the authenticated
/// identity. An invalid or expired token fails the request immediately; a
/// missing token defers the decision to the route's extractors.
pub async fn auth_middleware(
    State(session): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match session.verify(token).await {
            Ok(user) => {
                let actor = Actor::new(*user.id(), user.role());
                request.extensions_mut().insert(user);
                request.extensions_mut().insert(actor);
                next.run(request).await
            }
            Err(err) => err.into_response(),
        },
        None => next.run(request).await,
    }
}

/// Extractor for routes that require an authenticated actor.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))
    }
}

/// Extractor for routes that need the full authenticated user record.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))
    }
}
