//! Authentication
//!
//! Email/password identity for jobtrack:
//!
//! - **register**: creates the account, writes the profile once, opens a session
//! - **login** / **logout**: open and revoke bearer-token sessions
//! - **current_user**: resolves a token to the account plus its profile
//!
//! Passwords are stored as Argon2id PHC strings.

mod error;
mod password;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::{JobStore, Session, StoreError, UserProfile};

/// Placeholder for profile fields that were never filled in
pub const NOT_AVAILABLE: &str = "N/A";

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The signed-in user as seen by the rest of the application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub address: String,
    /// Profile creation time, or "N/A"
    pub created_at: String,
}

impl CurrentUser {
    fn from_parts(id: &str, email: &str, profile: Option<UserProfile>) -> Self {
        let na = || NOT_AVAILABLE.to_string();
        match profile {
            Some(p) => Self {
                id: id.to_string(),
                email: email.to_string(),
                full_name: non_blank(Some(p.full_name)).unwrap_or_else(na),
                username: non_blank(Some(p.username)).unwrap_or_else(na),
                phone_number: non_blank(p.phone_number).unwrap_or_else(na),
                date_of_birth: non_blank(p.date_of_birth).unwrap_or_else(na),
                address: non_blank(p.address).unwrap_or_else(na),
                created_at: p.created_at.to_rfc3339(),
            },
            None => Self {
                id: id.to_string(),
                email: email.to_string(),
                full_name: na(),
                username: na(),
                phone_number: na(),
                date_of_birth: na(),
                address: na(),
                created_at: na(),
            },
        }
    }
}

/// A freshly opened session together with its user
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: CurrentUser,
}

/// Email/password identity service backed by the job store
#[derive(Clone)]
pub struct AuthService {
    store: Arc<JobStore>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<JobStore>, session_ttl: Duration) -> Self {
        Self { store, session_ttl }
    }

    /// Create an account and its profile, then sign the new user in
    pub async fn register(&self, req: RegisterRequest) -> AuthResult<AuthSession> {
        validate_registration(&req)?;

        let email = req.email.trim().to_string();
        let password_hash = hash_password(&req.password)?;
        let account = self
            .store
            .create_account(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        let profile = UserProfile {
            user_id: account.id.clone(),
            full_name: req.full_name.trim().to_string(),
            username: req.username.trim().to_string(),
            email: email.clone(),
            phone_number: non_blank(req.phone_number),
            date_of_birth: non_blank(req.date_of_birth),
            address: non_blank(req.address),
            created_at: Utc::now(),
        };
        self.store.create_profile(&profile).await?;

        let session = self.store.create_session(&account.id, self.session_ttl).await?;
        tracing::info!(user_id = %account.id, "Account registered");

        Ok(AuthSession {
            token: session.token,
            expires_at: session.expires_at,
            user: CurrentUser::from_parts(&account.id, &account.email, Some(profile)),
        })
    }

    /// Sign in with email and password
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let account = self
            .store
            .account_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::warn!(user_id = %account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.store.create_session(&account.id, self.session_ttl).await?;
        let profile = self.store.profile(&account.id).await?;
        tracing::info!(user_id = %account.id, "User logged in");

        Ok(AuthSession {
            token: session.token,
            expires_at: session.expires_at,
            user: CurrentUser::from_parts(&account.id, &account.email, profile),
        })
    }

    /// Revoke a session token
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        if self.store.revoke_session(token).await? {
            tracing::info!("User logged out");
        }
        Ok(())
    }

    /// Resolve a bearer token to a live session
    pub async fn session(&self, token: &str) -> AuthResult<Session> {
        self.store
            .session(token)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Resolve a bearer token to the signed-in user
    pub async fn current_user(&self, token: &str) -> AuthResult<CurrentUser> {
        let session = self.session(token).await?;
        let account = self
            .store
            .account_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        let profile = self.store.profile(&account.id).await?;
        Ok(CurrentUser::from_parts(&account.id, &account.email, profile))
    }
}

fn validate_registration(req: &RegisterRequest) -> AuthResult<()> {
    let email = req.email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AuthError::Validation("Invalid email address".to_string()));
    }

    if req.password != req.confirm_password {
        return Err(AuthError::Validation("Passwords do not match.".to_string()));
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if req.full_name.trim().is_empty() {
        return Err(AuthError::Validation("Full name is required".to_string()));
    }
    if req.username.trim().is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }

    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
