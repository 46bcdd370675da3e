//! Job Routes
//!
//! CRUD endpoints for the signed-in user's job applications.
//!
//! - GET /api/v1/jobs - List jobs, newest first (`?q=` for prefix search)
//! - POST /api/v1/jobs - Create a job
//! - GET /api/v1/jobs/:id - Get a job
//! - PUT /api/v1/jobs/:id - Update a job
//! - DELETE /api/v1/jobs/:id - Delete a job
//!
//! Every mutation pushes fresh snapshots to the user's WebSocket subscribers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateJobRequest, JobListResponse, JobsQuery, UpdateJobRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::auth::CurrentUser;
use crate::search::search_jobs;
use crate::store::{Job, JobStatus, JobUpdate, NewJob};

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Query(query): Query<JobsQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let jobs = match query.q.as_deref() {
        Some(q) => search_jobs(&state.store, &user.id, q).await?,
        None => state.store.list_jobs(&user.id).await?,
    };

    Ok(Json(JobListResponse {
        total: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job = state.store.job(&user.id, &id).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
    ApiJson(req): ApiJson<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    let new_job = NewJob {
        company: required("company", &req.company)?,
        position: required("position", &req.position)?,
        status: req.status.as_deref().map(parse_status).transpose()?,
        notes: optional_text(req.notes),
        interview_date: req.interview_date,
    };

    let job = state.store.insert_job(&user.id, new_job).await?;
    tracing::info!(user_id = %user.id, job_id = %job.id, company = %job.company, "Created job");

    state.publish_snapshots(&user.id).await;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateJobRequest>,
) -> ApiResult<Json<Job>> {
    let update = JobUpdate {
        company: req.company.as_deref().map(|c| required("company", c)).transpose()?,
        position: req.position.as_deref().map(|p| required("position", p)).transpose()?,
        status: req.status.as_deref().map(parse_status).transpose()?,
        notes: req.notes.map(optional_text),
        interview_date: req.interview_date,
    };

    let job = if update.is_empty() {
        state.store.job(&user.id, &id).await?
    } else {
        state.store.update_job(&user.id, &id, update).await?
    };
    tracing::info!(user_id = %user.id, job_id = %job.id, status = %job.status, "Updated job");

    state.publish_snapshots(&user.id).await;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_job(&user.id, &id).await?;
    tracing::info!(user_id = %user.id, job_id = %id, "Deleted job");

    state.publish_snapshots(&user.id).await;
    Ok(StatusCode::NO_CONTENT)
}

fn required(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_status(value: &str) -> ApiResult<JobStatus> {
    value
        .parse::<JobStatus>()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("company", "  Acme ").unwrap(), "Acme");
        assert!(matches!(
            required("company", "   "),
            Err(ApiError::Validation(msg)) if msg == "company is required"
        ));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("interviewing").unwrap(), JobStatus::Interviewing);
        assert!(matches!(parse_status("Ghosted"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" hi ".to_string())), Some("hi".to_string()));
    }
}
