//! Dashboard statistics
//!
//! Derived in one pass over an owner's job list (newest first).

use serde::{Deserialize, Serialize};

use crate::store::{Job, JobStatus};

/// Number of jobs shown under recent activity
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Count of applications in one status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: usize,
}

/// Summary shown above the job list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    /// One entry per status, in `JobStatus::all()` order
    pub applications_by_status: Vec<StatusCount>,
    /// Jobs currently in the interview stage
    pub upcoming_interviews: Vec<Job>,
    /// Most recently created jobs
    pub recent_activities: Vec<Job>,
    pub total: usize,
}

impl DashboardStats {
    /// Build stats from jobs ordered newest first
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut counts = [0usize; 4];
        let mut upcoming_interviews = Vec::new();

        for job in jobs {
            counts[status_slot(job.status)] += 1;
            if job.status == JobStatus::Interviewing {
                upcoming_interviews.push(job.clone());
            }
        }

        let applications_by_status = JobStatus::all()
            .iter()
            .map(|&status| StatusCount {
                status,
                count: counts[status_slot(status)],
            })
            .collect();

        Self {
            applications_by_status,
            upcoming_interviews,
            recent_activities: jobs.iter().take(RECENT_ACTIVITY_LIMIT).cloned().collect(),
            total: jobs.len(),
        }
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.applications_by_status
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

fn status_slot(status: JobStatus) -> usize {
    match status {
        JobStatus::Applied => 0,
        JobStatus::Interviewing => 1,
        JobStatus::Offer => 2,
        JobStatus::Rejected => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(id: usize, status: JobStatus) -> Job {
        Job {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            company: format!("Company {}", id),
            position: "Engineer".to_string(),
            status,
            notes: None,
            interview_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_list_has_all_statuses_at_zero() {
        let stats = DashboardStats::from_jobs(&[]);
        assert_eq!(stats.applications_by_status.len(), 4);
        assert!(stats.applications_by_status.iter().all(|c| c.count == 0));
        assert_eq!(stats.applications_by_status[0].status, JobStatus::Applied);
        assert_eq!(stats.applications_by_status[3].status, JobStatus::Rejected);
        assert!(stats.upcoming_interviews.is_empty());
        assert!(stats.recent_activities.is_empty());
    }

    #[test]
    fn test_counts_and_interviews() {
        let jobs = vec![
            job(1, JobStatus::Interviewing),
            job(2, JobStatus::Applied),
            job(3, JobStatus::Applied),
            job(4, JobStatus::Offer),
            job(5, JobStatus::Interviewing),
        ];
        let stats = DashboardStats::from_jobs(&jobs);

        assert_eq!(stats.count(JobStatus::Applied), 2);
        assert_eq!(stats.count(JobStatus::Interviewing), 2);
        assert_eq!(stats.count(JobStatus::Offer), 1);
        assert_eq!(stats.count(JobStatus::Rejected), 0);
        assert_eq!(stats.total, 5);

        let interview_ids: Vec<_> = stats.upcoming_interviews.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(interview_ids, vec!["1", "5"]);
    }

    #[test]
    fn test_recent_activity_takes_first_five() {
        let jobs: Vec<_> = (0..8).map(|i| job(i, JobStatus::Applied)).collect();
        let stats = DashboardStats::from_jobs(&jobs);

        assert_eq!(stats.recent_activities.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(stats.recent_activities[0].id, "0");
        assert_eq!(stats.recent_activities[4].id, "4");
    }
}
