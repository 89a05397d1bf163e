use std::collections::HashMap;

use parking_lot::RwLock;

use super::{MasteryRepository, RepositoryError};
use crate::types::{Attempt, LearnerProfile, MasteryRecord};

/// Ledger held in process memory, keyed by profile id.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    profiles: RwLock<HashMap<String, LearnerProfile>>,
    records: RwLock<HashMap<String, Vec<MasteryRecord>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_profile(&self, profile: LearnerProfile) {
        self.profiles.write().insert(profile.id.clone(), profile);
    }

    /// Inserts a record as-is, replacing any row for the same fact.
    pub fn insert_record(&self, record: MasteryRecord) {
        let mut records = self.records.write();
        let rows = records.entry(record.profile_id.clone()).or_default();
        match rows.iter_mut().find(|row| row.fact == record.fact) {
            Some(row) => *row = record,
            None => rows.push(record),
        }
    }

    /// Creates the row for a first attempt or folds the attempt into it.
    pub fn record_attempt(&self, attempt: &Attempt) -> MasteryRecord {
        let mut records = self.records.write();
        let rows = records.entry(attempt.profile_id.clone()).or_default();
        match rows.iter_mut().find(|row| row.fact == attempt.fact) {
            Some(row) => {
                row.apply_attempt(attempt.correct, attempt.response_time_ms, attempt.at);
                row.clone()
            }
            None => {
                let record = MasteryRecord::first_attempt(attempt);
                rows.push(record.clone());
                record
            }
        }
    }

    /// Removes the profile and every record it owns.
    pub fn delete_profile(&self, profile_id: &str) -> bool {
        let removed = self.profiles.write().remove(profile_id).is_some();
        let dropped = self.records.write().remove(profile_id);
        if let Some(rows) = &dropped {
            tracing::debug!(profile_id, records = rows.len(), "deleted profile ledger");
        }
        removed || dropped.is_some()
    }
}

impl MasteryRepository for InMemoryLedger {
    async fn get_mastery_records(&self, profile_id: &str) -> Result<Vec<MasteryRecord>, RepositoryError> {
        Ok(self
            .records
            .read()
            .get(profile_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<LearnerProfile>, RepositoryError> {
        Ok(self.profiles.read().get(profile_id).cloned())
    }
}
