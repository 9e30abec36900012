//! Infrastructure layer for arbiter-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod commitments;
pub mod config;
pub mod evidence;
pub mod logging;
pub mod providers;
pub mod publisher;

// Re-export commonly used types
pub use commitments::{FileCommitmentStore, InMemoryCommitmentStore};
pub use config::{
    ConfigLoader, FileCommitmentsConfig, FileConfig, FileEvidenceConfig, FileJustifierConfig,
    FileLoggingConfig, FileProviderConfig, FilePublisherConfig, FileServerConfig,
};
pub use evidence::{ArchiveEvidenceStore, JsonManifestResolver};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiCompatibleAdapter, ProviderAdapter, RoutingGateway, build_gateway};
pub use publisher::FileContentPublisher;
