//! Progress notification port
//!
//! Defines the interface for reporting progress during an arbitration run.

use arbiter_domain::{DecisionVector, ModelVerdict};

/// Callback for progress updates during an arbitration run
///
/// Implementations live in the presentation layer.
pub trait ArbitrationProgress: Send + Sync {
    /// Called when a refinement round starts
    fn on_iteration_start(&self, iteration: u32, total: u32, panel_size: usize);

    /// Called when one panel entry has answered all of its calls
    fn on_model_complete(&self, iteration: u32, verdict: &ModelVerdict);

    /// Called with the round's weighted aggregate
    fn on_iteration_complete(&self, iteration: u32, aggregate: &DecisionVector);

    /// Called once the justifier has answered (or failed)
    fn on_justification(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ArbitrationProgress for NoProgress {
    fn on_iteration_start(&self, _iteration: u32, _total: u32, _panel_size: usize) {}
    fn on_model_complete(&self, _iteration: u32, _verdict: &ModelVerdict) {}
    fn on_iteration_complete(&self, _iteration: u32, _aggregate: &DecisionVector) {}
}
