//! Commitment store port
//!
//! Keyed storage for sealed results. The store is the only mutable state
//! shared between requests; `take` must be atomic so that at most one
//! reveal of a hash succeeds.

use arbiter_domain::{ArbitrationError, Commitment, CommitmentHash};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Commitment {0} already exists")]
    Duplicate(CommitmentHash),

    #[error("Corrupt commitment record: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ArbitrationError {
    fn from(error: StoreError) -> Self {
        ArbitrationError::infrastructure(error.to_string())
    }
}

#[async_trait]
pub trait CommitmentStore: Send + Sync {
    /// Persist a new commitment; an existing hash is never overwritten
    async fn save(&self, commitment: Commitment) -> Result<(), StoreError>;

    async fn get(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError>;

    /// Remove a commitment, returning whether it existed
    async fn delete(&self, hash: &CommitmentHash) -> Result<bool, StoreError>;

    /// Atomically look up and remove a commitment
    async fn take(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError>;

    /// Drop commitments older than `max_age`, returning how many were removed
    async fn purge_stale(&self, max_age: Duration) -> Result<usize, StoreError>;
}
