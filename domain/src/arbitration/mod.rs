//! Arbitration: panels, query objects, per-round state and results.

pub mod iteration;
pub mod panel;
pub mod query;
pub mod result;

pub use iteration::{IterationFeedback, IterationState, IterationStep, ModelVerdict};
pub use panel::{MAX_CALLS_PER_MODEL, PanelEntry, validate_panel};
pub use query::{Attachment, MAX_OUTCOMES, QueryObject, default_outcomes};
pub use result::{ArbitrationResult, JustificationRecord, OutcomeScore};
