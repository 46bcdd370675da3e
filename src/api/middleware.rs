//! Authentication Middleware
//!
//! Resolves `Authorization: Bearer <token>` to the signed-in user and makes
//! it available to handlers as `Extension<Arc<CurrentUser>>`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// Bearer token of the current request
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Reject requests without a live session
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(token) = bearer_token(&headers) else {
        tracing::debug!(path = %request.uri().path(), "Missing bearer token");
        return Err(ApiError::Unauthorized);
    };

    let user = state.auth.current_user(token).await?;
    let token = SessionToken(token.to_string());

    request.extensions_mut().insert(Arc::new(user));
    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
