//! Zip evidence bundles read from a local directory.
//!
//! A bundle `id` resolves to `<root>/<id>` or `<root>/<id>.zip`. Archives are
//! extracted on a blocking thread into a per-request working directory
//! named `arbiter-<random>` under the configured work dir (or the system
//! temp dir).

use super::manifest_resolver::MANIFEST_FILE;
use arbiter_application::ports::evidence_store::{EvidenceError, EvidenceStore};
use async_trait::async_trait;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub struct ArchiveEvidenceStore {
    root: PathBuf,
    work_dir: Option<PathBuf>,
}

impl ArchiveEvidenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            work_dir: None,
        }
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    /// Bundle ids are plain file names; anything that could walk out of
    /// `root` is refused.
    fn check_id(id: &str) -> Result<(), EvidenceError> {
        if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
            return Err(EvidenceError::Invalid(format!("bad bundle id: {:?}", id)));
        }
        Ok(())
    }

    fn candidates(&self, id: &str) -> [PathBuf; 2] {
        [self.root.join(id), self.root.join(format!("{}.zip", id))]
    }
}

/// An archive that wraps everything in one top-level folder resolves to
/// that folder.
fn bundle_root(dest: &Path) -> PathBuf {
    if dest.join(MANIFEST_FILE).is_file() {
        return dest.to_path_buf();
    }

    let Ok(entries) = std::fs::read_dir(dest) else {
        return dest.to_path_buf();
    };
    let dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();

    match dirs.as_slice() {
        [only] if only.join(MANIFEST_FILE).is_file() => only.clone(),
        _ => dest.to_path_buf(),
    }
}

#[async_trait]
impl EvidenceStore for ArchiveEvidenceStore {
    async fn create_work_dir(&self) -> Result<PathBuf, EvidenceError> {
        let base = self.work_dir.clone().unwrap_or_else(std::env::temp_dir);
        let dir = base.join(format!("arbiter-{:016x}", rand::random::<u64>()));
        fs::create_dir_all(&dir).await?;
        debug!("Created evidence work dir {}", dir.display());
        Ok(dir)
    }

    async fn fetch(&self, id: &str) -> Result<Vec<u8>, EvidenceError> {
        Self::check_id(id)?;

        for path in self.candidates(id) {
            match fs::read(&path).await {
                Ok(bytes) => {
                    debug!("Fetched {} ({} bytes)", path.display(), bytes.len());
                    return Ok(bytes);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) if e.kind() == ErrorKind::IsADirectory => {
                    return Err(EvidenceError::Invalid(format!(
                        "{} is a directory, expected a zip archive",
                        path.display()
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EvidenceError::NotFound(id.to_string()))
    }

    async fn unpack(&self, bytes: &[u8], dest: &Path) -> Result<PathBuf, EvidenceError> {
        let bytes = bytes.to_vec();
        let target = dest.to_path_buf();

        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&target)?;
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
                .map_err(|e| EvidenceError::Unpack(e.to_string()))?;
            // `extract` refuses entries whose names escape `target`
            archive
                .extract(&target)
                .map_err(|e| EvidenceError::Unpack(e.to_string()))?;
            Ok(bundle_root(&target))
        })
        .await
        .map_err(|e| EvidenceError::Unpack(e.to_string()))?
    }

    async fn validate(&self, path: &Path) -> bool {
        fs::metadata(path.join(MANIFEST_FILE))
            .await
            .is_ok_and(|m| m.is_file())
    }

    async fn cleanup(&self, dir: &Path) {
        match fs::remove_dir_all(dir).await {
            Ok(()) => debug!("Removed evidence work dir {}", dir.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", dir.display(), e),
        }
    }
}
