//! Commitment life cycle: seal, reveal, restore and purge.

use crate::ports::commitment_store::CommitmentStore;
use arbiter_domain::util::current_timestamp_millis;
use arbiter_domain::{ArbitrationError, ArbitrationResult, Commitment, CommitmentHash};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Owns the commitments of commit mode against a [`CommitmentStore`]
#[derive(Clone)]
pub struct CommitmentManager {
    store: Arc<dyn CommitmentStore>,
    max_age: Duration,
}

impl CommitmentManager {
    pub fn new(store: Arc<dyn CommitmentStore>, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    /// Seal `result` under a fresh random salt and persist it
    pub async fn commit(&self, result: ArbitrationResult) -> Result<CommitmentHash, ArbitrationError> {
        let salt = rand::random();
        let commitment = Commitment::seal(result, salt, current_timestamp_millis())?;
        let hash = commitment.hash;
        self.store.save(commitment).await?;
        info!("Stored commitment {}", hash);
        Ok(hash)
    }

    /// Consume a commitment; a second reveal of the same hash fails
    pub async fn reveal(&self, hash: &CommitmentHash) -> Result<Commitment, ArbitrationError> {
        let commitment = self
            .store
            .take(hash)
            .await?
            .ok_or_else(|| ArbitrationError::CommitmentNotFound(hash.to_hex()))?;
        if !commitment.verify() {
            warn!("Commitment {} does not match its stored result", hash);
        }
        info!("Revealed commitment {}", hash);
        Ok(commitment)
    }

    /// Put back a commitment whose reveal could not be completed
    pub async fn restore(&self, commitment: Commitment) -> Result<(), ArbitrationError> {
        let hash = commitment.hash;
        self.store.save(commitment).await?;
        debug!("Restored commitment {}", hash);
        Ok(())
    }

    /// Remove every commitment older than the configured maximum age
    pub async fn purge(&self) -> Result<usize, ArbitrationError> {
        let purged = self.store.purge_stale(self.max_age).await?;
        if purged > 0 {
            info!("Purged {} stale commitment(s)", purged);
        }
        Ok(purged)
    }

    /// Run [`purge`](Self::purge) in the background
    pub fn spawn_purge(&self) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            if let Err(e) = manager.purge().await {
                warn!("Commitment purge failed: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::commitment_store::StoreError;
    use arbiter_domain::{ErrorKind, OutcomeScore};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        records: Mutex<HashMap<CommitmentHash, Commitment>>,
    }

    #[async_trait]
    impl CommitmentStore for MapStore {
        async fn save(&self, commitment: Commitment) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            if records.contains_key(&commitment.hash) {
                return Err(StoreError::Duplicate(commitment.hash));
            }
            records.insert(commitment.hash, commitment);
            Ok(())
        }

        async fn get(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
            Ok(self.records.lock().unwrap().get(hash).cloned())
        }

        async fn delete(&self, hash: &CommitmentHash) -> Result<bool, StoreError> {
            Ok(self.records.lock().unwrap().remove(hash).is_some())
        }

        async fn take(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
            Ok(self.records.lock().unwrap().remove(hash))
        }

        async fn purge_stale(&self, max_age: Duration) -> Result<usize, StoreError> {
            let now = current_timestamp_millis();
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|_, c| !c.is_stale(now, max_age.as_millis() as u64));
            Ok(before - records.len())
        }
    }

    fn result() -> ArbitrationResult {
        ArbitrationResult {
            scores: vec![
                OutcomeScore {
                    outcome: "Buyer".into(),
                    score: 610_000,
                },
                OutcomeScore {
                    outcome: "Seller".into(),
                    score: 390_000,
                },
            ],
            justification: "The seller shipped late.".into(),
        }
    }

    fn manager() -> (CommitmentManager, Arc<MapStore>) {
        let store = Arc::new(MapStore::default());
        (
            CommitmentManager::new(store.clone(), Duration::from_secs(3600)),
            store,
        )
    }

    #[tokio::test]
    async fn test_commit_then_reveal_once() {
        let (manager, _) = manager();
        let hash = manager.commit(result()).await.unwrap();

        let revealed = manager.reveal(&hash).await.unwrap();
        assert_eq!(revealed.result, result());
        assert!(revealed.verify());

        let error = manager.reveal(&hash).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CommitmentNotFound);
    }

    #[tokio::test]
    async fn test_same_result_gets_distinct_hashes() {
        let (manager, _) = manager();
        let first = manager.commit(result()).await.unwrap();
        let second = manager.commit(result()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_restore_makes_commitment_revealable_again() {
        let (manager, _) = manager();
        let hash = manager.commit(result()).await.unwrap();
        let taken = manager.reveal(&hash).await.unwrap();

        manager.restore(taken).await.unwrap();
        assert!(manager.reveal(&hash).await.is_ok());
    }

    #[tokio::test]
    async fn test_spawned_purge_drops_only_stale_records() {
        let (manager, store) = manager();
        let fresh = manager.commit(result()).await.unwrap();

        let old = Commitment::seal(result(), [7; 16], 1_000).unwrap();
        let old_hash = old.hash;
        store.save(old).await.unwrap();

        manager.spawn_purge().await.unwrap();

        assert!(store.get(&fresh).await.unwrap().is_some());
        assert!(store.get(&old_hash).await.unwrap().is_none());
    }
}
