//! Dashboard Route
//!
//! - GET /api/v1/dashboard - Status counts, interviews and recent activity

use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::CurrentUser;
use crate::dashboard::DashboardStats;

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
) -> ApiResult<Json<DashboardStats>> {
    let jobs = state.store.list_jobs(&user.id).await?;
    Ok(Json(DashboardStats::from_jobs(&jobs)))
}
