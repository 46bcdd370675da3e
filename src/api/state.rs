//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthService;
use crate::config::ApiConfig;
use crate::dashboard::DashboardStats;
use crate::store::{JobStore, StoreResult};
use crate::websocket::{ConnectionHub, HubConfig, ServerMessage, Topic, WsEvent};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// SQLite-backed store for accounts, sessions and jobs
    pub store: Arc<JobStore>,
    /// Registration, login and session resolution
    pub auth: AuthService,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for live snapshots
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(store: Arc<JobStore>, auth: AuthService, config: ApiConfig) -> Self {
        let hub_config = HubConfig {
            max_connections: config.max_ws_connections,
        };
        Self {
            store,
            auth,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Build the current snapshot of one topic for a user
    pub async fn snapshot(&self, user_id: &str, topic: Topic) -> StoreResult<ServerMessage> {
        let jobs = self.store.list_jobs(user_id).await?;
        Ok(match topic {
            Topic::Jobs => ServerMessage::JobsSnapshot { jobs },
            Topic::Dashboard => ServerMessage::DashboardSnapshot {
                stats: DashboardStats::from_jobs(&jobs),
            },
        })
    }

    /// Push fresh snapshots to every live subscriber of this user
    ///
    /// Called after each job mutation. Failures are logged; the mutation
    /// itself has already succeeded.
    pub async fn publish_snapshots(&self, user_id: &str) {
        let wants_jobs = self.ws_hub.has_subscribers(user_id, Topic::Jobs).await;
        let wants_dashboard = self.ws_hub.has_subscribers(user_id, Topic::Dashboard).await;
        if !wants_jobs && !wants_dashboard {
            return;
        }

        let jobs = match self.store.list_jobs(user_id).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to load snapshot");
                return;
            }
        };

        if wants_dashboard {
            let stats = DashboardStats::from_jobs(&jobs);
            self.ws_hub.broadcast(&WsEvent::dashboard(user_id, stats)).await;
        }
        if wants_jobs {
            self.ws_hub.broadcast(&WsEvent::jobs(user_id, jobs)).await;
        }
    }
}
