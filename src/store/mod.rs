//! jobtrack store
//!
//! SQLite persistence for the four record kinds the tracker needs:
//!
//! - **accounts**: email + Argon2 password hash
//! - **profiles**: written once at registration, read-only afterwards
//! - **sessions**: opaque bearer tokens with an expiry
//! - **jobs**: job applications, scoped to their owner
//!
//! Ids and creation timestamps are assigned here, never by callers.

mod db;
mod error;
mod types;

pub use db::{JobStore, DB_FILE_NAME};
pub use error::{StoreError, StoreResult};
pub use types::{
    Account, Job, JobStatus, JobUpdate, NewJob, ParseStatusError, SearchField, Session,
    UserProfile,
};
