//! Arbitration results and the published justification record.

use crate::decision::DecisionVector;
use serde::{Deserialize, Serialize};

/// Score assigned to one outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeScore {
    pub outcome: String,
    pub score: u64,
}

/// The unit that is published, committed or revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationResult {
    pub scores: Vec<OutcomeScore>,
    pub justification: String,
}

impl ArbitrationResult {
    /// Pair each outcome label with its slot in the vector
    pub fn from_vector(
        outcomes: &[String],
        vector: &DecisionVector,
        justification: impl Into<String>,
    ) -> Self {
        let scores = outcomes
            .iter()
            .zip(vector.as_slice())
            .map(|(outcome, score)| OutcomeScore {
                outcome: outcome.clone(),
                score: *score,
            })
            .collect();
        Self {
            scores,
            justification: justification.into(),
        }
    }

    /// The scores in outcome order
    pub fn vector(&self) -> DecisionVector {
        DecisionVector::from_scores(self.scores.iter().map(|s| s.score).collect())
    }
}

/// The JSON document published for a justification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JustificationRecord {
    pub scores: Vec<OutcomeScore>,
    pub justification: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JustificationRecord {
    pub fn from_result(result: &ArbitrationResult, timestamp: u64) -> Self {
        Self {
            scores: result.scores.clone(),
            justification: result.justification.clone(),
            timestamp,
            error: None,
        }
    }

    /// Record published when the panel failed and no scores exist
    pub fn from_error(error: impl Into<String>, timestamp: u64) -> Self {
        Self {
            scores: Vec::new(),
            justification: String::new(),
            timestamp,
            error: Some(error.into()),
        }
    }
}
