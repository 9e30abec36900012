use arbiter_application::ports::commitment_store::{CommitmentStore, StoreError};
use arbiter_domain::util::current_timestamp_millis;
use arbiter_domain::{Commitment, CommitmentHash};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Commitments kept in a mutex-guarded map.
///
/// The lock is never held across an await point.
#[derive(Default)]
pub struct InMemoryCommitmentStore {
    records: Mutex<HashMap<CommitmentHash, Commitment>>,
}

impl InMemoryCommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, HashMap<CommitmentHash, Commitment>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Corrupt("commitment map lock poisoned".to_string()))
    }
}

#[async_trait]
impl CommitmentStore for InMemoryCommitmentStore {
    async fn save(&self, commitment: Commitment) -> Result<(), StoreError> {
        let mut records = self.records()?;
        if records.contains_key(&commitment.hash) {
            return Err(StoreError::Duplicate(commitment.hash));
        }
        records.insert(commitment.hash, commitment);
        Ok(())
    }

    async fn get(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
        Ok(self.records()?.get(hash).cloned())
    }

    async fn delete(&self, hash: &CommitmentHash) -> Result<bool, StoreError> {
        Ok(self.records()?.remove(hash).is_some())
    }

    async fn take(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
        Ok(self.records()?.remove(hash))
    }

    async fn purge_stale(&self, max_age: Duration) -> Result<usize, StoreError> {
        let now = current_timestamp_millis();
        let max_age_ms = max_age.as_millis() as u64;
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|_, c| !c.is_stale(now, max_age_ms));
        Ok(before - records.len())
    }
}
