//! Application layer for arbiter-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ArbiterConfig;
pub use ports::{
    commitment_store::{CommitmentStore, StoreError},
    content_publisher::{ContentPublisher, PublishError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    evidence_store::{EvidenceError, EvidenceStore},
    manifest_resolver::{ManifestResolver, UnpackedBundle},
    progress::{ArbitrationProgress, NoProgress},
    provider_gateway::{GatewayError, ModelInfo, ProviderGateway},
};
pub use use_cases::build_query::BuildQueryUseCase;
pub use use_cases::commitment::CommitmentManager;
pub use use_cases::evaluate::{EvaluateUseCase, OracleResponse};
pub use use_cases::list_models::ListModelsUseCase;
pub use use_cases::run_arbitration::RunArbitrationUseCase;
