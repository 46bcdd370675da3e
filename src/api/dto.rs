//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::Job;

// ============================================
// AUTH DTOs
// ============================================

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================
// JOB DTOs
// ============================================

/// Create job request
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub company: String,
    pub position: String,
    /// Defaults to "Applied"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<NaiveDate>,
}

/// Update job request
///
/// Absent fields are left unchanged; `null` clears `notes` and
/// `interview_date`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub interview_date: Option<Option<NaiveDate>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query string of `GET /api/v1/jobs`
#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    /// Prefix search over company and position
    #[serde(default)]
    pub q: Option<String>,
}

/// Job list response
#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Store status
    pub store: String,
    /// Open WebSocket connections
    pub websocket_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateJobRequest =
            serde_json::from_str(r#"{"status": "Offer", "notes": null}"#).unwrap();
        assert_eq!(req.status.as_deref(), Some("Offer"));
        assert_eq!(req.notes, Some(None));
        assert_eq!(req.interview_date, None);
        assert!(req.company.is_none());

        let req: UpdateJobRequest =
            serde_json::from_str(r#"{"interview_date": "2024-03-01"}"#).unwrap();
        assert_eq!(
            req.interview_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1))
        );
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateJobRequest =
            serde_json::from_str(r#"{"company": "Acme", "position": "Engineer"}"#).unwrap();
        assert!(req.status.is_none());
        assert!(req.notes.is_none());
    }
}
