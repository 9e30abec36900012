//! Decision vectors: representation, parsing and aggregation.
//!
//! A decision vector is a fixed-point distribution over the outcome set,
//! scaled so its slots sum to 1,000,000.
//!
//! ```text
//!   model output ──parse──▶ call vector ──average_calls──▶ model vector
//!                    │                                          │
//!                    └─ fallback: uniform                       ▼
//!                                              weighted_mean ──▶ iteration vector
//! ```

pub mod aggregate;
pub mod parsing;
pub mod vector;

pub use aggregate::{average_calls, weighted_mean};
pub use parsing::{CallDecision, LLM_ERROR_TAG, ParsedDecision, parse_decision_response, parse_or_fallback};
pub use vector::{DEFAULT_OUTCOME_COUNT, DecisionVector, SCORE_SCALE};
