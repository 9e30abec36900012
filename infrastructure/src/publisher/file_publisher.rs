//! Content-addressed publishing to a local directory.

use arbiter_application::ports::content_publisher::{ContentPublisher, PublishError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writes each record to `<dir>/<sha256>.json` and returns the hex digest
/// as its content id. Publishing identical bytes twice yields the same id
/// and leaves the existing file untouched.
pub struct FileContentPublisher {
    dir: PathBuf,
}

impl FileContentPublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, cid: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cid))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ContentPublisher for FileContentPublisher {
    async fn publish(&self, bytes: &[u8]) -> Result<String, PublishError> {
        if bytes.is_empty() {
            return Err(PublishError::Rejected("empty content".to_string()));
        }

        let cid = hex::encode(Sha256::digest(bytes));
        let path = self.path_for(&cid);

        if fs::try_exists(&path).await? {
            debug!("Content {} already published", cid);
            return Ok(cid);
        }

        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, bytes).await?;
        info!("Published {} ({} bytes)", path.display(), bytes.len());
        Ok(cid)
    }
}
