//! # jobtrack
//!
//! Job application tracker - a Rust API for recording applications,
//! following their status, and watching a live dashboard.
//!
//! ## Features
//!
//! - **Accounts**: email/password registration with a one-time profile
//! - **Job records**: per-user CRUD with status Applied, Interviewing, Offer or Rejected
//! - **Search**: case-sensitive prefix search over company and position
//! - **Dashboard**: status counts, interviews in progress, recent activity
//! - **Real-time**: WebSocket snapshots pushed after every change
//!
//! ## Modules
//!
//! - [`store`]: SQLite persistence for accounts, sessions and jobs
//! - [`auth`]: Registration, login and session tokens
//! - [`search`]: Merged prefix search
//! - [`dashboard`]: Statistics derived from a job list
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Live snapshot subscriptions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jobtrack::store::{JobStatus, JobStore, NewJob};
//! use jobtrack::dashboard::DashboardStats;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JobStore::open(std::path::Path::new("./jobtrack_data"))?;
//!     let account = store.create_account("ada@example.com", "argon2-hash").await?;
//!
//!     store
//!         .insert_job(&account.id, NewJob::new("Acme", "Engineer").status(JobStatus::Interviewing))
//!         .await?;
//!
//!     let jobs = store.list_jobs(&account.id).await?;
//!     let stats = DashboardStats::from_jobs(&jobs);
//!     println!("{} interviewing", stats.count(JobStatus::Interviewing));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod search;
pub mod store;
pub mod websocket;

// Re-export top-level types for convenience
pub use store::{
    Job, JobStatus, JobStore, JobUpdate, NewJob, SearchField, StoreError, StoreResult,
    UserProfile,
};

pub use auth::{AuthError, AuthService, AuthSession, CurrentUser, RegisterRequest};

pub use dashboard::{DashboardStats, StatusCount};

pub use search::search_jobs;

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, Topic,
    WsEvent,
};

pub use config::{ApiConfig, AuthConfig, Config, ConfigError, LoggingConfig, StoreConfig};
