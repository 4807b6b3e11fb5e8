//! HTTP handlers for auth endpoints.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};

use crate::application::RegisterInput;
use crate::domain::{ApiError, Role};

use super::super::middleware::CurrentUser;
use super::super::{AppState, CookieSettings, Envelope};
use super::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateDetailsRequest,
};

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .auth
        .register(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.unwrap_or(Role::User),
        })
        .await?;

    Ok(token_response(&state.cookie, outcome.token))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.auth.login(&req.email, &req.password).await?;
    Ok(token_response(&state.cookie, outcome.token))
}

/// GET /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    // Expire the cookie shortly instead of relying on client deletion.
    let expires = (Utc::now() + Duration::seconds(10)).format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!("token=none; Expires={}; HttpOnly; Path=/", expires);
    if state.cookie.secure {
        cookie.push_str("; Secure");
    }

    Ok(([(SET_COOKIE, cookie)], Json(Envelope::empty())).into_response())
}

/// GET /api/v1/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Result<Json<Envelope>, ApiError> {
    Ok(Json(Envelope::data(&user)?))
}

/// PUT /api/v1/auth/updatedetails
pub async fn update_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateDetailsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    let updated = state
        .auth
        .update_details(user.id(), req.name, req.email)
        .await?;
    Ok(Json(Envelope::data(&updated)?))
}

/// PUT /api/v1/auth/changepassword
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .auth
        .change_password(user.id(), &req.current_password, &req.new_password)
        .await?;
    Ok(token_response(&state.cookie, outcome.token))
}

/// POST /api/v1/auth/forgotpassword
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<Envelope>, ApiError> {
    state
        .auth
        .forgot_password(&req.email, &state.reset_url_base)
        .await?;
    Ok(Json(Envelope::data(&"Email sent")?))
}

/// PUT /api/v1/auth/resetpassword/:resetToken
pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.auth.reset_password(&reset_token, &req.password).await?;
    Ok(token_response(&state.cookie, outcome.token))
}

/// `{success, token}` plus the httpOnly session cookie.
fn token_response(settings: &CookieSettings, token: String) -> Response {
    let expires = (Utc::now() + Duration::days(settings.expire_days))
        .format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!("token={}; Expires={}; HttpOnly; Path=/", token, expires);
    if settings.secure {
        cookie.push_str("; Secure");
    }

    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(Envelope::token(token)),
    )
        .into_response()
}
