//! Evidence store port
//!
//! Fetches evidence bundles by identifier and unpacks them into a
//! per-request working directory.

use arbiter_domain::ArbitrationError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while retrieving or reading evidence
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("Evidence not found: {0}")]
    NotFound(String),

    #[error("Failed to unpack evidence: {0}")]
    Unpack(String),

    #[error("Invalid evidence bundle: {0}")]
    Invalid(String),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EvidenceError> for ArbitrationError {
    fn from(error: EvidenceError) -> Self {
        ArbitrationError::infrastructure(error.to_string())
    }
}

/// Storage holding evidence bundles
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Create a fresh working directory for one request
    async fn create_work_dir(&self) -> Result<PathBuf, EvidenceError>;

    /// Raw bytes of the bundle named `id`
    async fn fetch(&self, id: &str) -> Result<Vec<u8>, EvidenceError>;

    /// Unpack `bytes` below `dest`, returning the bundle root
    async fn unpack(&self, bytes: &[u8], dest: &Path) -> Result<PathBuf, EvidenceError>;

    /// Whether `path` looks like a complete bundle
    async fn validate(&self, path: &Path) -> bool;

    /// Remove a working directory; failures are logged, never raised
    async fn cleanup(&self, dir: &Path);
}
