use arbiter_application::ports::commitment_store::{CommitmentStore, StoreError};
use arbiter_domain::util::current_timestamp_millis;
use arbiter_domain::{Commitment, CommitmentHash};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

const RECORD_EXTENSION: &str = "json";

/// Commitments stored as `<dir>/<hash>.json`.
///
/// - `save` writes a temporary file and hard-links it into place, so a record
///   is never visible half-written and an existing hash is never replaced.
/// - `take` claims a record by renaming it away; only one rename of a path
///   can succeed, which makes reveal single-use across processes.
pub struct FileCommitmentStore {
    dir: PathBuf,
}

impl FileCommitmentStore {
    /// Open the store, creating `dir` if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, hash: &CommitmentHash) -> PathBuf {
        self.dir.join(format!("{}.{}", hash.to_hex(), RECORD_EXTENSION))
    }

    fn scratch_path(&self, hash: &CommitmentHash, purpose: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}-{:016x}",
            hash.to_hex(),
            purpose,
            rand::random::<u64>()
        ))
    }

    async fn read_record(path: &Path) -> Result<Option<Commitment>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CommitmentStore for FileCommitmentStore {
    async fn save(&self, commitment: Commitment) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&commitment)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let target = self.record_path(&commitment.hash);
        let scratch = self.scratch_path(&commitment.hash, "tmp");

        fs::write(&scratch, bytes).await?;
        let linked = fs::hard_link(&scratch, &target).await;
        let _ = fs::remove_file(&scratch).await;

        match linked {
            Ok(()) => {
                debug!("Wrote commitment {}", target.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::Duplicate(commitment.hash))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
        Self::read_record(&self.record_path(hash)).await
    }

    async fn delete(&self, hash: &CommitmentHash) -> Result<bool, StoreError> {
        match fs::remove_file(self.record_path(hash)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn take(&self, hash: &CommitmentHash) -> Result<Option<Commitment>, StoreError> {
        let claimed = self.scratch_path(hash, "claimed");
        match fs::rename(self.record_path(hash), &claimed).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let record = Self::read_record(&claimed).await;
        let _ = fs::remove_file(&claimed).await;
        record
    }

    async fn purge_stale(&self, max_age: Duration) -> Result<usize, StoreError> {
        let now = current_timestamp_millis();
        let max_age_ms = max_age.as_millis() as u64;
        let mut purged = 0;

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            let commitment = match Self::read_record(&path).await {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping unreadable commitment: {}", e);
                    continue;
                }
            };

            if commitment.is_stale(now, max_age_ms) && self.delete(&commitment.hash).await? {
                purged += 1;
            }
        }

        Ok(purged)
    }
}
