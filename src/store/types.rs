//! Core data types for the jobtrack store
//!
//! This module defines the records persisted by the store:
//! - `Job`: A tracked job application
//! - `JobStatus`: The fixed four-value application status
//! - `Account`, `UserProfile`, `Session`: Identity records

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Status of a job application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    /// Application sent, no response yet
    #[default]
    Applied,
    /// In the interview process
    Interviewing,
    /// Offer received
    Offer,
    /// Application turned down
    Rejected,
}

impl JobStatus {
    /// Get all statuses in display order
    pub fn all() -> &'static [JobStatus] {
        &[
            JobStatus::Applied,
            JobStatus::Interviewing,
            JobStatus::Offer,
            JobStatus::Rejected,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four statuses
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid status: {0}. Use Applied, Interviewing, Offer, or Rejected")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Ok(JobStatus::Applied),
            "interviewing" => Ok(JobStatus::Interviewing),
            "offer" => Ok(JobStatus::Offer),
            "rejected" => Ok(JobStatus::Rejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl ToSql for JobStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for JobStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A tracked job application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Store-assigned identifier (UUID v4)
    pub id: String,
    /// Account that owns this record
    pub owner_id: String,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Scheduled interview date, if any
    #[serde(default)]
    pub interview_date: Option<NaiveDate>,
    /// Assigned by the store on insert
    pub created_at: DateTime<Utc>,
    /// Assigned by the store on every edit
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for a new job record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    /// Defaults to `Applied`
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<NaiveDate>,
}

impl NewJob {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Default::default()
        }
    }

    /// Builder method: set status
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder method: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method: set interview date
    pub fn interview_date(mut self, date: NaiveDate) -> Self {
        self.interview_date = Some(date);
        self
    }
}

/// Partial update of a job record
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub notes: Option<Option<String>>,
    pub interview_date: Option<Option<NaiveDate>>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.position.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.interview_date.is_none()
    }
}

/// Field a prefix search runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Company,
    Position,
}

impl SearchField {
    pub(crate) fn column(&self) -> &'static str {
        match self {
            SearchField::Company => "company",
            SearchField::Position => "position",
        }
    }
}

/// Login credentials record
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    /// PHC-format Argon2 hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Profile document written once at registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An open login session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("applied".parse::<JobStatus>(), Ok(JobStatus::Applied));
        assert_eq!("OFFER".parse::<JobStatus>(), Ok(JobStatus::Offer));
        assert_eq!(" Interviewing ".parse::<JobStatus>(), Ok(JobStatus::Interviewing));
        assert!("ghosted".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_default_is_applied() {
        assert_eq!(JobStatus::default(), JobStatus::Applied);
    }

    #[test]
    fn test_status_serializes_as_variant_name() {
        let json = serde_json::to_string(&JobStatus::Interviewing).unwrap();
        assert_eq!(json, "\"Interviewing\"");
    }

    #[test]
    fn test_job_update_is_empty() {
        assert!(JobUpdate::default().is_empty());
        let update = JobUpdate {
            notes: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token: "t".to_string(),
            user_id: "u".to_string(),
            created_at: now - chrono::Duration::hours(2),
            expires_at: now - chrono::Duration::hours(1),
        };
        assert!(session.is_expired());
    }
}
