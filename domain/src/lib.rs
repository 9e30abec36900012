//! Domain layer for arbiter-quorum
//!
//! This crate contains the arbitration logic: decision vectors, their
//! aggregation, refinement rounds, evidence merging and commitments.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Decision vector
//!
//! A fixed-point distribution over the outcome set whose slots sum to
//! [`decision::SCORE_SCALE`]. Every model call produces one; calls of the
//! same model are averaged, models are combined by weighted mean.
//!
//! ## Panel
//!
//! The weighted list of [`PanelEntry`] models consulted for one query,
//! possibly over several refinement rounds.
//!
//! ## Commitment
//!
//! A salted 128-bit [`CommitmentHash`] that binds a stored result until it
//! is revealed.

pub mod arbitration;
pub mod commitment;
pub mod config;
pub mod core;
pub mod decision;
pub mod evidence;
pub mod prompt;
pub mod util;

// Re-export commonly used types
pub use arbitration::{
    ArbitrationResult, Attachment, IterationFeedback, IterationState, IterationStep,
    JustificationRecord, MAX_CALLS_PER_MODEL, MAX_OUTCOMES, ModelVerdict, OutcomeScore, PanelEntry,
    QueryObject, default_outcomes, validate_panel,
};
pub use commitment::{Commitment, CommitmentHash, CommitmentParseError, SALT_BYTES};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{
    error::{ArbitrationError, ErrorKind},
    model::{ModelRef, ModelRefParseError},
};
pub use decision::{DecisionVector, SCORE_SCALE};
pub use evidence::{EvidenceRequest, Manifest, ProtocolMode, ProtocolRequest};
pub use prompt::PromptTemplate;
