//! Read seam between the engine and wherever the mastery ledger lives.

pub mod memory;
pub mod sqlite_ledger;
pub mod sqlite_schema;

use std::future::Future;

use crate::types::{LearnerProfile, MasteryRecord};

pub use memory::InMemoryLedger;
pub use sqlite_ledger::SqliteLedger;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid stored value for {column}: {value}")]
    InvalidValue { column: &'static str, value: String },
}

/// Read-only access to one device's learners and their mastery ledgers.
///
/// Each call returns a point-in-time snapshot; the engine issues a single
/// ledger read per computation.
pub trait MasteryRepository: Send + Sync {
    fn get_mastery_records(
        &self,
        profile_id: &str,
    ) -> impl Future<Output = Result<Vec<MasteryRecord>, RepositoryError>> + Send;

    fn get_profile(
        &self,
        profile_id: &str,
    ) -> impl Future<Output = Result<Option<LearnerProfile>, RepositoryError>> + Send;
}
