//! Commitment store adapters.
//!
//! - [`InMemoryCommitmentStore`]: process-local map, for single-instance deployments
//! - [`FileCommitmentStore`]: one JSON file per hash, survives restarts and can be
//!   shared by instances on the same filesystem

mod file;
mod memory;

pub use file::FileCommitmentStore;
pub use memory::InMemoryCommitmentStore;
