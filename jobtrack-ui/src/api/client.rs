//! HTTP API Client
//!
//! Functions for communicating with the jobtrack REST API. Every call
//! except register and login carries the stored session token as a
//! bearer header.

use chrono::NaiveDate;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::state::global::{CurrentUser, DashboardStats, Job, JobStatus};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

const API_URL_KEY: &str = "jobtrack_api_url";
const TOKEN_KEY: &str = "jobtrack_token";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// WebSocket URL for the API base, authenticated with `token`
pub fn ws_url(api_base: &str, token: &str) -> String {
    let base = api_base
        .replacen("https://", "wss://", 1)
        .replacen("http://", "ws://", 1);
    format!("{}/ws?token={}", base.trim_end_matches('/'), token)
}

/// Stored session token, if any
pub fn get_token() -> Option<String> {
    local_storage()
        .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
        .filter(|token| !token.is_empty())
}

pub fn set_token(token: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

// ============ Request/Response Types ============

#[derive(Debug, Clone, serde::Serialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: CurrentUser,
}

#[derive(Debug, serde::Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

/// Fields of the add/edit job forms
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JobForm {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    /// `None` is sent as `null`, clearing the notes on update
    pub notes: Option<String>,
    pub interview_date: Option<NaiveDate>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

// ============ Helpers ============

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match get_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn error_message(response: Response, fallback: &str) -> String {
    response
        .json::<ApiError>()
        .await
        .map(|e| e.error.message)
        .unwrap_or_else(|_| fallback.to_string())
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn expect_empty(response: Response) -> Result<(), String> {
    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }
    Ok(())
}

// ============ API Functions ============

/// Create an account and store its session token
pub async fn register(form: &RegisterForm) -> Result<AuthSession, String> {
    let api_base = get_api_base();

    let response = Request::post(&format!("{}/auth/register", api_base))
        .json(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let session: AuthSession = parse(response).await?;
    set_token(&session.token);
    Ok(session)
}

/// Sign in and store the session token
pub async fn login(email: &str, password: &str) -> Result<AuthSession, String> {
    #[derive(serde::Serialize)]
    struct LoginRequest<'a> {
        email: &'a str,
        password: &'a str,
    }

    let api_base = get_api_base();

    let response = Request::post(&format!("{}/auth/login", api_base))
        .json(&LoginRequest { email, password })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let session: AuthSession = parse(response).await?;
    set_token(&session.token);
    Ok(session)
}

/// Revoke the session; the local token is dropped even if the call fails
pub async fn logout() -> Result<(), String> {
    let api_base = get_api_base();

    let result = authorized(Request::post(&format!("{}/auth/logout", api_base)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e));

    clear_token();
    expect_empty(result?).await
}

/// Fetch the signed-in user
pub async fn fetch_me() -> Result<CurrentUser, String> {
    let api_base = get_api_base();

    let response = authorized(Request::get(&format!("{}/me", api_base)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

/// Fetch the user's jobs, filtered by company/position prefix when `query` is set
pub async fn fetch_jobs(query: Option<&str>) -> Result<Vec<Job>, String> {
    let api_base = get_api_base();

    let builder = Request::get(&format!("{}/jobs", api_base));
    let builder = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => builder.query([("q", q)]),
        None => builder,
    };

    let response = authorized(builder)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let result: JobListResponse = parse(response).await?;
    Ok(result.jobs)
}

/// Create a job application
pub async fn create_job(form: &JobForm) -> Result<Job, String> {
    let api_base = get_api_base();

    let response = authorized(Request::post(&format!("{}/jobs", api_base)))
        .json(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

/// Replace every editable field of a job
pub async fn update_job(id: &str, form: &JobForm) -> Result<Job, String> {
    let api_base = get_api_base();

    let response = authorized(Request::put(&format!("{}/jobs/{}", api_base, id)))
        .json(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

/// Delete a job application
pub async fn delete_job(id: &str) -> Result<(), String> {
    let api_base = get_api_base();

    let response = authorized(Request::delete(&format!("{}/jobs/{}", api_base, id)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    expect_empty(response).await
}

/// Fetch dashboard statistics
pub async fn fetch_dashboard() -> Result<DashboardStats, String> {
    let api_base = get_api_base();

    let response = authorized(Request::get(&format!("{}/dashboard", api_base)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url() {
        assert_eq!(
            ws_url("http://localhost:8090/api/v1", "abc"),
            "ws://localhost:8090/api/v1/ws?token=abc"
        );
        assert_eq!(
            ws_url("https://jobs.example.com/api/v1/", "t"),
            "wss://jobs.example.com/api/v1/ws?token=t"
        );
    }

    #[test]
    fn test_job_form_sends_null_notes() {
        let form = JobForm {
            company: "Acme".into(),
            position: "Engineer".into(),
            status: JobStatus::Offer,
            notes: None,
            interview_date: None,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["status"], "Offer");
        assert!(json["notes"].is_null());
        assert!(json.as_object().unwrap().contains_key("interview_date"));
    }

    #[test]
    fn test_error_body_parse() {
        let body = r#"{"error":{"code":"UNAUTHORIZED","message":"Authentication required"},"request_id":null}"#;
        let err: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(err.error.code, "UNAUTHORIZED");
        assert_eq!(err.error.message, "Authentication required");
    }
}
