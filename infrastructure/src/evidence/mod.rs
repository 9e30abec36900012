//! Evidence bundle adapters: archive retrieval and manifest parsing.

mod archive_store;
mod manifest_resolver;

pub use archive_store::ArchiveEvidenceStore;
pub use manifest_resolver::{JsonManifestResolver, MANIFEST_FILE};
