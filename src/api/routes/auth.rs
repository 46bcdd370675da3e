//! Auth Routes
//!
//! - POST /api/v1/auth/register - Create an account and sign in
//! - POST /api/v1/auth/login - Sign in with email and password
//! - POST /api/v1/auth/logout - Revoke the current session
//! - GET /api/v1/me - Current user profile

use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::api::dto::LoginRequest;
use crate::api::error::ApiResult;
use crate::api::extract::ApiJson;
use crate::api::middleware::SessionToken;
use crate::api::state::AppState;
use crate::auth::{AuthSession, CurrentUser, RegisterRequest};

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let session = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<StatusCode> {
    state.auth.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me
pub async fn me(Extension(user): Extension<Arc<CurrentUser>>) -> Json<CurrentUser> {
    Json(user.as_ref().clone())
}
