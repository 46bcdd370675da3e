//! Global Application State
//!
//! Reactive state management using Leptos signals.

use chrono::{DateTime, NaiveDate, Utc};
use leptos::*;
use serde::{Deserialize, Serialize};

use crate::api;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// The user's jobs, newest first
    pub jobs: RwSignal<Vec<Job>>,
    /// Dashboard statistics
    pub stats: RwSignal<Option<DashboardStats>>,
    /// Current search box contents
    pub search_query: RwSignal<String>,
    /// Results for a non-blank search
    pub search_results: RwSignal<Option<Vec<Job>>>,
    /// Job open in the edit modal
    pub editing: RwSignal<Option<Job>>,
    /// WebSocket connection status
    pub ws_connected: RwSignal<bool>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Status of a job application
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStatus {
    pub fn all() -> [JobStatus; 4] {
        [
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

    pub fn parse(s: &str) -> Option<JobStatus> {
        Self::all().into_iter().find(|status| status.as_str() == s)
    }

    /// Badge colour classes
    pub fn badge_class(&self) -> &'static str {
        match self {
            JobStatus::Applied => "bg-blue-600 text-blue-100",
            JobStatus::Interviewing => "bg-yellow-500 text-yellow-950",
            JobStatus::Offer => "bg-green-600 text-green-100",
            JobStatus::Rejected => "bg-red-600 text-red-100",
        }
    }
}

/// Job application record from the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn applied_on(&self) -> String {
        self.created_at.format("%b %e, %Y").to_string()
    }
}

/// Applications in one status
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: usize,
}

/// Dashboard statistics from the API
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DashboardStats {
    pub applications_by_status: Vec<StatusCount>,
    pub upcoming_interviews: Vec<Job>,
    pub recent_activities: Vec<Job>,
    pub total: usize,
}

/// Signed-in user profile
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub address: String,
    pub created_at: String,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        jobs: create_rw_signal(Vec::new()),
        stats: create_rw_signal(None),
        search_query: create_rw_signal(String::new()),
        search_results: create_rw_signal(None),
        editing: create_rw_signal(None),
        ws_connected: create_rw_signal(false),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Jobs to show: search results while searching, otherwise everything
    pub fn visible_jobs(&self) -> Vec<Job> {
        self.search_results
            .get()
            .unwrap_or_else(|| self.jobs.get())
    }

    /// Drop all per-user data (on logout)
    pub fn clear(&self) {
        self.jobs.set(Vec::new());
        self.stats.set(None);
        self.search_query.set(String::new());
        self.search_results.set(None);
        self.editing.set(None);
    }

    /// Reload jobs (and search results) plus dashboard statistics
    pub fn refresh(&self) {
        let state = *self;
        state.loading.set(true);
        spawn_local(async move {
            match api::fetch_jobs(None).await {
                Ok(jobs) => state.jobs.set(jobs),
                Err(e) => state.show_error(&format!("Failed to load jobs: {}", e)),
            }

            let query = state.search_query.get_untracked();
            if !query.trim().is_empty() {
                if let Ok(results) = api::fetch_jobs(Some(&query)).await {
                    state.search_results.set(Some(results));
                }
            }

            match api::fetch_dashboard().await {
                Ok(stats) => state.stats.set(Some(stats)),
                Err(e) => state.show_error(&format!("Failed to load dashboard: {}", e)),
            }
            state.loading.set(false);
        });
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_badges() {
        assert_eq!(JobStatus::parse("Offer"), Some(JobStatus::Offer));
        assert_eq!(JobStatus::parse("offer"), None);
        assert!(JobStatus::Applied.badge_class().contains("blue"));
        assert!(JobStatus::Interviewing.badge_class().contains("yellow"));
        assert!(JobStatus::Offer.badge_class().contains("green"));
        assert!(JobStatus::Rejected.badge_class().contains("red"));
    }

    #[test]
    fn test_job_deserialize() {
        let json = r#"{
            "id": "j1",
            "owner_id": "u1",
            "company": "Acme",
            "position": "Engineer",
            "status": "Interviewing",
            "notes": null,
            "interview_date": "2024-03-01",
            "created_at": "2024-02-01T10:00:00Z",
            "updated_at": null
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::Interviewing);
        assert_eq!(job.applied_on(), "Feb  1, 2024");
        assert_eq!(job.interview_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
