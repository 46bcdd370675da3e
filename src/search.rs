//! Job search
//!
//! A search is two prefix queries, one over company and one over position,
//! issued together and merged by job id.

use std::collections::HashSet;

use crate::store::{Job, JobStore, SearchField, StoreResult};

/// Search an owner's jobs by company or position prefix
///
/// A blank query returns the full list, newest first.
pub async fn search_jobs(store: &JobStore, owner_id: &str, query: &str) -> StoreResult<Vec<Job>> {
    let query = query.trim();
    if query.is_empty() {
        return store.list_jobs(owner_id).await;
    }

    let (by_company, by_position) = tokio::join!(
        store.jobs_with_prefix(owner_id, SearchField::Company, query),
        store.jobs_with_prefix(owner_id, SearchField::Position, query),
    );

    let merged = merge_by_id(by_company?, by_position?);
    tracing::debug!(owner_id = %owner_id, query = %query, hits = merged.len(), "Job search");
    Ok(merged)
}

/// Union of two result sets keyed by id, keeping the first occurrence
pub fn merge_by_id(first: Vec<Job>, second: Vec<Job>) -> Vec<Job> {
    let mut seen = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|job| seen.insert(job.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JobStatus, NewJob};
    use chrono::Utc;
    use tempfile::tempdir;

    fn job(id: &str, company: &str) -> Job {
        Job {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            status: JobStatus::Applied,
            notes: None,
            interview_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_merge_drops_duplicates() {
        let merged = merge_by_id(
            vec![job("1", "Acme"), job("2", "Apex")],
            vec![job("2", "Apex"), job("3", "Zeta")],
        );
        let ids: Vec<_> = merged.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_merge_empty_sides() {
        assert!(merge_by_id(Vec::new(), Vec::new()).is_empty());
        assert_eq!(merge_by_id(Vec::new(), vec![job("1", "Acme")]).len(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_either_field_once() {
        let dir = tempdir().unwrap();
        let store = JobStore::open(dir.path()).unwrap();
        let owner = store.create_account("ada@example.com", "hash").await.unwrap().id;

        store.insert_job(&owner, NewJob::new("Rust Corp", "Rust Engineer")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Acme", "Rust Developer")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Globex", "Designer")).await.unwrap();

        let hits = search_jobs(&store, &owner, "Rust").await.unwrap();
        let companies: Vec<_> = hits.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, vec!["Rust Corp", "Acme"]);
    }

    #[tokio::test]
    async fn test_blank_query_lists_everything() {
        let dir = tempdir().unwrap();
        let store = JobStore::open(dir.path()).unwrap();
        let owner = store.create_account("ada@example.com", "hash").await.unwrap().id;

        store.insert_job(&owner, NewJob::new("Acme", "Engineer")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Globex", "Designer")).await.unwrap();

        assert_eq!(search_jobs(&store, &owner, "   ").await.unwrap().len(), 2);
    }
}
