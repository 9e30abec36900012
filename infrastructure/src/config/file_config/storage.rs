//! Evidence, publisher and transcript locations
//! (`[evidence]`, `[publisher]`, `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEvidenceConfig {
    /// Directory holding evidence bundles, one per identifier
    pub root: PathBuf,
    /// Where per-request working directories are created (system temp dir if unset)
    pub work_dir: Option<PathBuf>,
}

impl Default for FileEvidenceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("evidence"),
            work_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePublisherConfig {
    /// Directory justification records are published to
    pub dir: PathBuf,
}

impl Default for FilePublisherConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("published"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every model exchange (disabled if unset)
    pub transcript_path: Option<PathBuf>,
}
