//! Commitment store configuration from TOML (`[commitments]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const MEMORY_BACKEND: &str = "memory";
pub const FILE_BACKEND: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCommitmentsConfig {
    /// `"memory"` (single instance) or `"file"` (survives restarts)
    pub backend: String,
    /// Directory of the file backend
    pub dir: PathBuf,
    /// Unrevealed commitments older than this are purged
    pub max_age_secs: u64,
    /// How often the background purge runs
    pub purge_interval_secs: u64,
}

impl Default for FileCommitmentsConfig {
    fn default() -> Self {
        Self {
            backend: MEMORY_BACKEND.to_string(),
            dir: PathBuf::from("commitments"),
            max_age_secs: 7 * 24 * 60 * 60,
            purge_interval_secs: 60 * 60,
        }
    }
}
