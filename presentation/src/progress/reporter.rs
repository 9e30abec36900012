//! Progress reporting for arbitration runs

use arbiter_application::ports::progress::ArbitrationProgress;
use arbiter_domain::{DecisionVector, ModelVerdict};
use tracing::{info, warn};

/// Reports each round and model answer through `tracing`
pub struct TracingProgress;

impl ArbitrationProgress for TracingProgress {
    fn on_iteration_start(&self, iteration: u32, total: u32, panel_size: usize) {
        info!("Round {}/{}: querying {} panel entries", iteration, total, panel_size);
    }

    fn on_model_complete(&self, iteration: u32, verdict: &ModelVerdict) {
        if verdict.fallback_calls > 0 {
            warn!(
                "Round {}: {}/{} fell back to a uniform vector on {} call(s)",
                iteration, verdict.provider, verdict.model, verdict.fallback_calls
            );
        }
        info!(
            "Round {}: {}/{} (weight {}) -> {:?}",
            iteration,
            verdict.provider,
            verdict.model,
            verdict.weight,
            verdict.vector.as_slice()
        );
    }

    fn on_iteration_complete(&self, iteration: u32, aggregate: &DecisionVector) {
        info!("Round {} aggregate: {:?}", iteration, aggregate.as_slice());
    }

    fn on_justification(&self, success: bool) {
        if !success {
            warn!("Justifier failed; using placeholder justification");
        }
    }
}
