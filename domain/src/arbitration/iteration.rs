//! Iteration state for refinement rounds.
//!
//! ```text
//! Running(1) ──▶ Running(2) ──▶ … ──▶ Running(N) ──▶ Done
//!     │               ▲                   │
//!     └─ feedback ────┘                   └─ justifier runs here only
//! ```
//!
//! Each round owns a fresh [`IterationState`]. The only thing that crosses a
//! round boundary is [`IterationFeedback`], moved by value into the next
//! round.

use crate::core::error::ArbitrationError;
use crate::decision::{DecisionVector, weighted_mean};
use serde::{Deserialize, Serialize};

/// Position of the iteration controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationStep {
    Running { iteration: u32, total: u32 },
    Done,
}

impl IterationStep {
    /// First step of a run with `total` rounds (`Done` when `total` is zero)
    pub fn start(total: u32) -> Self {
        if total == 0 {
            IterationStep::Done
        } else {
            IterationStep::Running {
                iteration: 1,
                total,
            }
        }
    }

    pub fn advance(self) -> Self {
        match self {
            IterationStep::Running { iteration, total } if iteration < total => {
                IterationStep::Running {
                    iteration: iteration + 1,
                    total,
                }
            }
            _ => IterationStep::Done,
        }
    }

    /// Whether this is the round that produces the user-facing result
    pub fn is_final(&self) -> bool {
        matches!(self, IterationStep::Running { iteration, total } if iteration == total)
    }
}

/// One panel entry's answer for one round, after intra-model averaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub provider: String,
    pub model: String,
    pub weight: f64,
    pub vector: DecisionVector,
    pub justification: String,
    /// Calls whose output had to be replaced by the uniform fallback
    pub fallback_calls: u32,
}

impl ModelVerdict {
    /// Line used in the feedback block of later rounds
    pub fn feedback_line(&self) -> String {
        format!(
            "- {}/{}: score {}; justification: {}",
            self.provider,
            self.model,
            self.vector,
            self.justification.trim()
        )
    }
}

/// Accumulator for a single round
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState {
    pub iteration: u32,
    pub verdicts: Vec<ModelVerdict>,
}

impl IterationState {
    pub fn new(iteration: u32) -> Self {
        Self {
            iteration,
            verdicts: Vec::new(),
        }
    }

    pub fn push(&mut self, verdict: ModelVerdict) {
        self.verdicts.push(verdict);
    }

    pub fn outputs(&self) -> Vec<&DecisionVector> {
        self.verdicts.iter().map(|v| &v.vector).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.verdicts.iter().map(|v| v.weight).collect()
    }

    /// Per-model rationales labelled with their origin, in panel order
    pub fn justifications(&self) -> Vec<String> {
        self.verdicts
            .iter()
            .map(|v| format!("{}/{}: {}", v.provider, v.model, v.justification.trim()))
            .collect()
    }

    /// Cross-model weighted mean of this round
    pub fn aggregate(&self) -> Result<DecisionVector, ArbitrationError> {
        let inputs: Vec<(&DecisionVector, f64)> = self
            .verdicts
            .iter()
            .map(|v| (&v.vector, v.weight))
            .collect();
        weighted_mean(&inputs)
    }
}

/// Formatted responses of all finished rounds, fed into the next prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationFeedback {
    responses: Vec<String>,
}

impl IterationFeedback {
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// Consume the feedback so far and append a finished round
    pub fn absorb(mut self, state: &IterationState) -> Self {
        let mut block = format!("Iteration {}:", state.iteration);
        for verdict in &state.verdicts {
            block.push('\n');
            block.push_str(&verdict.feedback_line());
        }
        self.responses.push(block);
        self
    }
}
