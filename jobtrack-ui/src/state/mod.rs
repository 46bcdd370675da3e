//! State Management
//!
//! Global application state, the signed-in session and the WebSocket
//! connection that keeps both fresh.

pub mod auth;
pub mod global;
pub mod websocket;

pub use auth::{provide_auth_state, AuthState};
pub use global::{provide_global_state, CurrentUser, DashboardStats, GlobalState, Job, JobStatus};
pub use websocket::WebSocketClient;
