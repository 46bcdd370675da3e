//! Job Store - SQLite-backed persistence for accounts, profiles, sessions and jobs
//!
//! One connection guarded by an async mutex. Statements are short, so they run
//! inline on the calling task.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::types::{Account, Job, JobUpdate, NewJob, SearchField, Session, UserProfile};

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "jobtrack.db";

/// Upper bound appended to a prefix for range queries
const PREFIX_SENTINEL: char = '\u{f8ff}';

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
    full_name TEXT NOT NULL,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    phone_number TEXT,
    date_of_birth TEXT,
    address TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    revoked INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    company TEXT NOT NULL,
    position TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Applied'
        CHECK (status IN ('Applied', 'Interviewing', 'Offer', 'Rejected')),
    notes TEXT,
    interview_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_owner_created ON jobs(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_jobs_owner_company ON jobs(owner_id, company);
CREATE INDEX IF NOT EXISTS idx_jobs_owner_position ON jobs(owner_id, position);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
";

const JOB_COLUMNS: &str =
    "id, owner_id, company, position, status, notes, interview_date, created_at, updated_at";

/// SQLite-backed store for all jobtrack records
pub struct JobStore {
    conn: Mutex<Connection>,
}

impl JobStore {
    /// Create or open the store in `data_dir`
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DB_FILE_NAME);

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;
        conn.execute_batch(SCHEMA)?;

        tracing::info!(path = ?path, "Job store opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Cheap round-trip used by readiness probes
    pub async fn ping(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    // --- Account operations ---

    /// Create a login account. Emails are unique, compared case-insensitively.
    pub async fn create_account(&self, email: &str, password_hash: &str) -> StoreResult<Account> {
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO accounts (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![account.id, account.email, account.password_hash, account.created_at],
        )
        .map_err(|e| conflict_or(e, "Email already registered"))?;

        Ok(account)
    }

    pub async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock().await;
        let account = conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?1",
                [email],
                row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    pub async fn account_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock().await;
        let account = conn
            .query_row(
                "SELECT id, email, password_hash, created_at FROM accounts WHERE id = ?1",
                [id],
                row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    // --- Profile operations ---

    /// Write the profile document. Each account gets exactly one.
    pub async fn create_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO profiles
                (user_id, full_name, username, email, phone_number, date_of_birth, address, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                profile.user_id,
                profile.full_name,
                profile.username,
                profile.email,
                profile.phone_number,
                profile.date_of_birth,
                profile.address,
                profile.created_at,
            ],
        )
        .map_err(|e| conflict_or(e, "Profile already exists"))?;
        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        let conn = self.conn.lock().await;
        let profile = conn
            .query_row(
                "SELECT user_id, full_name, username, email, phone_number, date_of_birth, address, created_at
                 FROM profiles WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(UserProfile {
                        user_id: row.get(0)?,
                        full_name: row.get(1)?,
                        username: row.get(2)?,
                        email: row.get(3)?,
                        phone_number: row.get(4)?,
                        date_of_birth: row.get(5)?,
                        address: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    // --- Session operations ---

    /// Open a new session valid for `ttl`
    pub async fn create_session(&self, user_id: &str, ttl: Duration) -> StoreResult<Session> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| StoreError::OutOfRange(format!("session expiry {} after now", ttl)))?;
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![session.token, session.user_id, session.created_at, session.expires_at],
        )?;
        Ok(session)
    }

    /// Look up a live session. Revoked and expired sessions are not returned.
    pub async fn session(&self, token: &str) -> StoreResult<Option<Session>> {
        let conn = self.conn.lock().await;
        let session = conn
            .query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions
                 WHERE token = ?1 AND revoked = 0",
                [token],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(session.filter(|s| !s.is_expired()))
    }

    /// Revoke a session. Returns false if the token was unknown or already revoked.
    pub async fn revoke_session(&self, token: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE sessions SET revoked = 1 WHERE token = ?1 AND revoked = 0",
            [token],
        )?;
        Ok(changed > 0)
    }

    /// Delete expired and revoked sessions, returning how many were removed
    pub async fn purge_expired_sessions(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE revoked = 1 OR expires_at <= ?1",
            params![Utc::now()],
        )?;
        Ok(removed)
    }

    // --- Job operations ---

    /// Insert a job. The store assigns the id and creation time.
    pub async fn insert_job(&self, owner_id: &str, new_job: NewJob) -> StoreResult<Job> {
        let job = Job {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            company: new_job.company,
            position: new_job.position,
            status: new_job.status.unwrap_or_default(),
            notes: new_job.notes,
            interview_date: new_job.interview_date,
            created_at: Utc::now(),
            updated_at: None,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO jobs (id, owner_id, company, position, status, notes, interview_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                job.id,
                job.owner_id,
                job.company,
                job.position,
                job.status,
                job.notes,
                job.interview_date,
                job.created_at,
            ],
        )?;

        Ok(job)
    }

    pub async fn job(&self, owner_id: &str, id: &str) -> StoreResult<Job> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {} FROM jobs WHERE owner_id = ?1 AND id = ?2", JOB_COLUMNS);
        conn.query_row(&sql, params![owner_id, id], row_to_job)
            .optional()?
            .ok_or_else(|| StoreError::job_not_found(id))
    }

    /// All jobs of an owner, newest first
    pub async fn list_jobs(&self, owner_id: &str) -> StoreResult<Vec<Job>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM jobs WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC",
            JOB_COLUMNS
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let jobs = stmt
            .query_map([owner_id], row_to_job)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    /// Apply a partial update. The id and creation time never change.
    pub async fn update_job(&self, owner_id: &str, id: &str, update: JobUpdate) -> StoreResult<Job> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {} FROM jobs WHERE owner_id = ?1 AND id = ?2", JOB_COLUMNS);
        let mut job = conn
            .query_row(&sql, params![owner_id, id], row_to_job)
            .optional()?
            .ok_or_else(|| StoreError::job_not_found(id))?;

        if let Some(company) = update.company {
            job.company = company;
        }
        if let Some(position) = update.position {
            job.position = position;
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(notes) = update.notes {
            job.notes = notes;
        }
        if let Some(interview_date) = update.interview_date {
            job.interview_date = interview_date;
        }
        job.updated_at = Some(Utc::now());

        conn.execute(
            "UPDATE jobs
             SET company = ?1, position = ?2, status = ?3, notes = ?4, interview_date = ?5, updated_at = ?6
             WHERE owner_id = ?7 AND id = ?8",
            params![
                job.company,
                job.position,
                job.status,
                job.notes,
                job.interview_date,
                job.updated_at,
                owner_id,
                id,
            ],
        )?;

        Ok(job)
    }

    pub async fn delete_job(&self, owner_id: &str, id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM jobs WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        if removed == 0 {
            return Err(StoreError::job_not_found(id));
        }
        Ok(())
    }

    /// Range query `field >= prefix AND field < prefix || U+F8FF`, ordered by that field
    pub async fn jobs_with_prefix(
        &self,
        owner_id: &str,
        field: SearchField,
        prefix: &str,
    ) -> StoreResult<Vec<Job>> {
        let column = field.column();
        let upper = format!("{}{}", prefix, PREFIX_SENTINEL);
        let sql = format!(
            "SELECT {cols} FROM jobs
             WHERE owner_id = ?1 AND {col} >= ?2 AND {col} < ?3
             ORDER BY {col}, rowid",
            cols = JOB_COLUMNS,
            col = column
        );

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&sql)?;
        let jobs = stmt
            .query_map(params![owner_id, prefix, upper], row_to_job)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }
}

fn row_to_account(row: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
    let updated_at: Option<DateTime<Utc>> = row.get(8)?;
    Ok(Job {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        company: row.get(2)?,
        position: row.get(3)?,
        status: row.get(4)?,
        notes: row.get(5)?,
        interview_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at,
    })
}

/// Map unique-constraint violations to `Conflict`
fn conflict_or(err: rusqlite::Error, message: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JobStatus;
    use tempfile::tempdir;

    async fn store_with_account() -> (JobStore, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = JobStore::open(dir.path()).unwrap();
        let account = store.create_account("ada@example.com", "hash").await.unwrap();
        (store, account.id, dir)
    }

    #[tokio::test]
    async fn test_insert_defaults_status_to_applied() {
        let (store, owner, _dir) = store_with_account().await;

        let job = store
            .insert_job(&owner, NewJob::new("Acme", "Engineer"))
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Applied);
        assert!(job.updated_at.is_none());
        assert_eq!(store.list_jobs(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (store, owner, _dir) = store_with_account().await;

        store.insert_job(&owner, NewJob::new("First", "A")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Second", "B")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Third", "C")).await.unwrap();

        let companies: Vec<_> = store
            .list_jobs(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.company)
            .collect();
        assert_eq!(companies, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_sets_updated_at() {
        let (store, owner, _dir) = store_with_account().await;
        let job = store
            .insert_job(&owner, NewJob::new("Acme", "Engineer").notes("referral"))
            .await
            .unwrap();

        let updated = store
            .update_job(
                &owner,
                &job.id,
                JobUpdate {
                    status: Some(JobStatus::Offer),
                    notes: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, job.id);
        assert_eq!(updated.company, "Acme");
        assert_eq!(updated.status, JobStatus::Offer);
        assert!(updated.notes.is_none());
        assert!(updated.updated_at.is_some());

        let reloaded = store.job(&owner, &job.id).await.unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_delete_removes_job() {
        let (store, owner, _dir) = store_with_account().await;
        let job = store.insert_job(&owner, NewJob::new("Acme", "Engineer")).await.unwrap();

        store.delete_job(&owner, &job.id).await.unwrap();

        assert!(store.list_jobs(&owner).await.unwrap().is_empty());
        assert!(matches!(
            store.delete_job(&owner, &job.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_jobs_are_scoped_to_owner() {
        let (store, owner, _dir) = store_with_account().await;
        let other = store.create_account("bob@example.com", "hash").await.unwrap();
        let job = store.insert_job(&owner, NewJob::new("Acme", "Engineer")).await.unwrap();

        assert!(store.list_jobs(&other.id).await.unwrap().is_empty());
        assert!(matches!(
            store.job(&other.id, &job.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_job(&other.id, &job.id, JobUpdate::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_prefix_query() {
        let (store, owner, _dir) = store_with_account().await;
        store.insert_job(&owner, NewJob::new("Google", "SRE")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Goldman", "Analyst")).await.unwrap();
        store.insert_job(&owner, NewJob::new("Amazon", "Go Developer")).await.unwrap();

        let by_company = store
            .jobs_with_prefix(&owner, SearchField::Company, "Go")
            .await
            .unwrap();
        let names: Vec<_> = by_company.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(names, vec!["Goldman", "Google"]);

        let by_position = store
            .jobs_with_prefix(&owner, SearchField::Position, "Go")
            .await
            .unwrap();
        assert_eq!(by_position.len(), 1);
        assert_eq!(by_position[0].company, "Amazon");
    }

    #[tokio::test]
    async fn test_prefix_upper_bound_is_exclusive() {
        let (store, owner, _dir) = store_with_account().await;
        store.insert_job(&owner, NewJob::new("Go", "A")).await.unwrap();
        store
            .insert_job(&owner, NewJob::new(format!("Go{}", PREFIX_SENTINEL), "B"))
            .await
            .unwrap();

        let jobs = store
            .jobs_with_prefix(&owner, SearchField::Company, "Go")
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Go");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (store, _owner, _dir) = store_with_account().await;
        let result = store.create_account("ADA@example.com", "hash").await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_profile_is_create_once() {
        let (store, owner, _dir) = store_with_account().await;
        let profile = UserProfile {
            user_id: owner.clone(),
            full_name: "Ada Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
            ..Default::default()
        };

        store.create_profile(&profile).await.unwrap();
        assert!(matches!(
            store.create_profile(&profile).await,
            Err(StoreError::Conflict(_))
        ));

        let loaded = store.profile(&owner).await.unwrap().unwrap();
        assert_eq!(loaded.username, "ada");
        assert!(loaded.phone_number.is_none());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (store, owner, _dir) = store_with_account().await;
        let session = store.create_session(&owner, Duration::hours(1)).await.unwrap();

        assert!(store.session(&session.token).await.unwrap().is_some());
        assert!(store.revoke_session(&session.token).await.unwrap());
        assert!(store.session(&session.token).await.unwrap().is_none());
        assert!(!store.revoke_session(&session.token).await.unwrap());

        let expired = store.create_session(&owner, Duration::seconds(-1)).await.unwrap();
        assert!(store.session(&expired.token).await.unwrap().is_none());
        assert_eq!(store.purge_expired_sessions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_session_expiry_overflow_is_an_error() {
        let (store, owner, _dir) = store_with_account().await;
        let result = store.create_session(&owner, Duration::weeks(1_000_000_000)).await;
        assert!(matches!(result, Err(StoreError::OutOfRange(_))));
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let owner = {
            let store = JobStore::open(dir.path()).unwrap();
            let account = store.create_account("ada@example.com", "hash").await.unwrap();
            store.insert_job(&account.id, NewJob::new("Acme", "Engineer")).await.unwrap();
            account.id
        };

        let store = JobStore::open(dir.path()).unwrap();
        assert_eq!(store.list_jobs(&owner).await.unwrap().len(), 1);
    }
}
