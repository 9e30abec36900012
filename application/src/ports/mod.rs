//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod commitment_store;
pub mod content_publisher;
pub mod conversation_logger;
pub mod evidence_store;
pub mod manifest_resolver;
pub mod progress;
pub mod provider_gateway;
