//! jobtrack REST API
//!
//! HTTP API layer for jobtrack, built with Axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/v1/auth/register` - Create an account (201)
//! - `POST /api/v1/auth/login` - Sign in
//! - `POST /api/v1/auth/logout` - Revoke the session (204)
//! - `GET /api/v1/me` - Current user profile
//!
//! ## Jobs
//! - `GET /api/v1/jobs` - List jobs (`?q=` for prefix search)
//! - `POST /api/v1/jobs` - Create a job
//! - `GET /api/v1/jobs/:id` - Get a job
//! - `PUT /api/v1/jobs/:id` - Update a job
//! - `DELETE /api/v1/jobs/:id` - Delete a job
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard` - Status counts, interviews, recent activity
//!
//! ## WebSocket
//! - `GET /api/v1/ws?token=` - Live job and dashboard snapshots
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Everything under `/api/v1` except register, login and the WebSocket
//! upgrade requires `Authorization: Bearer <token>`.

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use crate::config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route(
            "/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route(
            "/jobs/:id",
            get(routes::jobs::get_job)
                .put(routes::jobs::update_job)
                .delete(routes::jobs::delete_job),
        )
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route_layer(from_fn_with_state(
            Arc::clone(&shared_state),
            middleware::require_auth,
        ));

    let api_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/ws", get(websocket_handler))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(shared_state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&shared_state.config.cors_origins);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("jobtrack API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("jobtrack API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthService;
    use crate::store::JobStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(JobStore::open(dir.path()).unwrap());
        let auth = AuthService::new(Arc::clone(&store), chrono::Duration::hours(1));
        let router = build_router(AppState::new(store, auth, ApiConfig::default()));
        (router, dir)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) -> String {
        let response = send(
            app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": "hunter22",
                "confirm_password": "hunter22",
                "full_name": "Ada Lovelace",
                "username": "ada"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _dir) = create_test_app().await;

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = send(&app, "GET", uri, None, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (app, _dir) = create_test_app().await;

        let response = send(&app, "GET", "/api/v1/jobs", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let response = send(&app, "GET", "/api/v1/me", Some("bogus"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_fills_missing_profile_fields() {
        let (app, _dir) = create_test_app().await;
        let token = register(&app, "ada@example.com").await;

        let response = send(&app, "GET", "/api/v1/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let user = body_json(response).await;
        assert_eq!(user["email"], "ada@example.com");
        assert_eq!(user["phone_number"], "N/A");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (app, _dir) = create_test_app().await;
        register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "ada@example.com",
                "password": "hunter22",
                "confirm_password": "hunter22",
                "full_name": "Ada",
                "username": "ada2"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let (app, _dir) = create_test_app().await;
        register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "wrong-one"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "Failed to log in. Please check your credentials."
        );

        let response = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "hunter22"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_json(response).await["token"].as_str().unwrap().to_string();

        let response = send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/api/v1/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let (app, _dir) = create_test_app().await;
        let token = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/api/v1/jobs",
            Some(&token),
            Some(json!({"company": "Acme", "position": "Engineer", "notes": "Referral"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let job = body_json(response).await;
        assert_eq!(job["status"], "Applied");
        let id = job["id"].as_str().unwrap().to_string();

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/jobs/{}", id),
            Some(&token),
            Some(json!({"status": "Interviewing", "notes": null})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["status"], "Interviewing");
        assert_eq!(updated["company"], "Acme");
        assert!(updated["notes"].is_null());

        let response = send(&app, "GET", "/api/v1/dashboard", Some(&token), None).await;
        let stats = body_json(response).await;
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["upcoming_interviews"][0]["id"], id.as_str());

        let response = send(
            &app,
            "DELETE",
            &format!("/api/v1/jobs/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/jobs/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_job_validation() {
        let (app, _dir) = create_test_app().await;
        let token = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/api/v1/jobs",
            Some(&token),
            Some(json!({"company": "  ", "position": "Engineer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            "POST",
            "/api/v1/jobs",
            Some(&token),
            Some(json!({"company": "Acme", "position": "Engineer", "status": "Ghosted"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let (app, _dir) = create_test_app().await;
        let token = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/api/v1/jobs",
            Some(&token),
            Some(json!({"position": "Engineer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("company"));

        let response = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ada@example.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_search_and_owner_isolation() {
        let (app, _dir) = create_test_app().await;
        let ada = register(&app, "ada@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        for (company, position) in [("Acme", "Engineer"), ("Globex", "Acme Liaison"), ("Initech", "Analyst")] {
            send(
                &app,
                "POST",
                "/api/v1/jobs",
                Some(&ada),
                Some(json!({"company": company, "position": position})),
            )
            .await;
        }

        let response = send(&app, "GET", "/api/v1/jobs?q=Acme", Some(&ada), None).await;
        let body = body_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["jobs"][0]["company"], "Acme");
        assert_eq!(body["jobs"][1]["company"], "Globex");

        let response = send(&app, "GET", "/api/v1/jobs", Some(&bob), None).await;
        let body = body_json(response).await;
        assert_eq!(body["total"], 0);
    }
}
