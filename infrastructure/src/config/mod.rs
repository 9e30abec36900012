//! Configuration file loading for arbiter-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `JUSTIFIER_MODEL` environment variable
//! 2. `ARBITER_*` environment variables (e.g. `ARBITER_COMMITMENTS__BACKEND=file`)
//! 3. `--config <path>` specified file
//! 4. Project root: `./arbiter.toml` or `./.arbiter.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/arbiter-quorum/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    FILE_BACKEND, FileCommitmentsConfig, FileConfig, FileEvidenceConfig, FileJustifierConfig,
    FileLoggingConfig, FileProviderConfig, FilePublisherConfig, FileServerConfig, MEMORY_BACKEND,
};
pub use loader::{ConfigLoader, JUSTIFIER_ENV};
