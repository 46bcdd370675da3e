//! WebSocket Message Types
//!
//! Messages exchanged between the web UI and the jobtrack server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dashboard::DashboardStats;
use crate::store::Job;

/// Snapshot topics a connection can follow
///
/// Topics are always scoped to the user that owns the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// The user's full job list
    Jobs,
    /// The user's dashboard statistics
    Dashboard,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Jobs => "jobs",
            Topic::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobs" => Ok(Topic::Jobs),
            "dashboard" => Ok(Topic::Dashboard),
            other => Err(format!("Unknown topic: {}", other)),
        }
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving snapshots for topics
    Subscribe { topics: Vec<String> },
    /// Stop receiving snapshots for topics
    Unsubscribe { topics: Vec<String> },
    /// Keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { connection_id: String },
    /// Subscription confirmed
    Subscribed { topics: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<String> },
    /// Current job list, newest first
    JobsSnapshot { jobs: Vec<Job> },
    /// Current dashboard statistics
    DashboardSnapshot { stats: DashboardStats },
    /// Pong response to ping
    Pong,
    /// Error message
    Error { message: String },
}

/// Event routed through the hub to one user's subscribers
#[derive(Debug, Clone)]
pub struct WsEvent {
    pub user_id: String,
    pub topic: Topic,
    pub message: ServerMessage,
}

impl WsEvent {
    pub fn jobs(user_id: &str, jobs: Vec<Job>) -> Self {
        Self {
            user_id: user_id.to_string(),
            topic: Topic::Jobs,
            message: ServerMessage::JobsSnapshot { jobs },
        }
    }

    pub fn dashboard(user_id: &str, stats: DashboardStats) -> Self {
        Self {
            user_id: user_id.to_string(),
            topic: Topic::Dashboard,
            message: ServerMessage::DashboardSnapshot { stats },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["jobs", "dashboard"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => assert_eq!(topics, vec!["jobs", "dashboard"]),
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_topic_parse() {
        assert_eq!("jobs".parse::<Topic>().unwrap(), Topic::Jobs);
        assert_eq!("dashboard".parse::<Topic>().unwrap(), Topic::Dashboard);
        assert!("metrics.*".parse::<Topic>().is_err());
    }

    #[test]
    fn test_server_message_serialize_snapshot() {
        let msg = ServerMessage::JobsSnapshot { jobs: vec![] };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"jobs_snapshot","jobs":[]}"#);
    }

    #[test]
    fn test_server_message_serialize_dashboard() {
        let event = WsEvent::dashboard("u1", DashboardStats::from_jobs(&[]));
        assert_eq!(event.topic, Topic::Dashboard);
        let json = serde_json::to_string(&event.message).unwrap();
        assert!(json.contains("\"type\":\"dashboard_snapshot\""));
        assert!(json.contains("\"applications_by_status\""));
    }
}
