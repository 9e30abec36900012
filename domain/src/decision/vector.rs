//! Fixed-point outcome distributions.

use crate::core::error::ArbitrationError;
use serde::{Deserialize, Serialize};

/// Total probability mass of a normalized decision vector
pub const SCORE_SCALE: u64 = 1_000_000;

/// Outcome count assumed when nothing else is known
pub const DEFAULT_OUTCOME_COUNT: usize = 2;

/// Below this a float is treated as integral when flooring
const FLOOR_EPSILON: f64 = 1e-6;

/// A distribution over K outcomes, scaled so the slots sum to [`SCORE_SCALE`].
///
/// # Example
///
/// ```
/// use arbiter_domain::decision::DecisionVector;
///
/// let fallback = DecisionVector::uniform(3);
/// assert_eq!(fallback.as_slice(), &[333_334, 333_333, 333_333]);
/// assert!(fallback.is_normalized());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionVector(Vec<u64>);

impl DecisionVector {
    /// Wrap raw scores without checking the sum
    pub fn from_scores(scores: Vec<u64>) -> Self {
        Self(scores)
    }

    /// Uniform fallback distribution.
    ///
    /// Every slot gets `SCORE_SCALE / k`; the remainder goes to slot 0 so the
    /// total is exactly [`SCORE_SCALE`]. `k == 0` means "unknown" and falls
    /// back to [`DEFAULT_OUTCOME_COUNT`].
    pub fn uniform(k: usize) -> Self {
        let k = if k == 0 { DEFAULT_OUTCOME_COUNT } else { k };
        let base = SCORE_SCALE / k as u64;
        let mut scores = vec![base; k];
        scores[0] += SCORE_SCALE - base * k as u64;
        Self(scores)
    }

    /// Scale arbitrary non-negative weights to a normalized vector.
    ///
    /// Accepts percentages, probabilities or already-scaled integers alike.
    pub fn normalize(raw: &[f64]) -> Result<Self, ArbitrationError> {
        if raw.is_empty() {
            return Err(ArbitrationError::Parse("empty score list".to_string()));
        }
        if raw.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ArbitrationError::Parse(
                "scores must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(ArbitrationError::Parse("scores sum to zero".to_string()));
        }
        let scaled: Vec<f64> = raw
            .iter()
            .map(|v| v / total * SCORE_SCALE as f64)
            .collect();
        Ok(Self(apportion(&scaled, SCORE_SCALE)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn is_normalized(&self) -> bool {
        !self.0.is_empty() && self.total() == SCORE_SCALE
    }

    /// Index of the highest-scoring outcome (first on ties)
    pub fn leader(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }
}

impl std::fmt::Display for DecisionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Round real-valued slots to integers summing to `target` (largest remainder).
///
/// Each slot is floored; the missing units go to the slots with the largest
/// fractional parts, so no slot moves past its own ceiling.
pub(crate) fn apportion(values: &[f64], target: u64) -> Vec<u64> {
    let mut floors: Vec<u64> = values
        .iter()
        .map(|v| (v + FLOOR_EPSILON).floor().max(0.0) as u64)
        .collect();
    let fractions: Vec<f64> = values
        .iter()
        .zip(&floors)
        .map(|(v, f)| (v - *f as f64).max(0.0))
        .collect();

    let assigned: u64 = floors.iter().sum();
    if assigned >= target || floors.is_empty() {
        return floors;
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        fractions[b]
            .partial_cmp(&fractions[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut missing = target - assigned;
    for &i in order.iter().cycle() {
        if missing == 0 {
            break;
        }
        floors[i] += 1;
        missing -= 1;
    }
    floors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_binary() {
        let v = DecisionVector::uniform(2);
        assert_eq!(v.as_slice(), &[500_000, 500_000]);
    }

    #[test]
    fn test_uniform_sums_to_scale_for_awkward_counts() {
        for k in 1..=13 {
            let v = DecisionVector::uniform(k);
            assert_eq!(v.len(), k);
            assert_eq!(v.total(), SCORE_SCALE, "k = {}", k);
        }
        assert_eq!(DecisionVector::uniform(7).as_slice()[0], 142_858);
    }

    #[test]
    fn test_uniform_unknown_count_defaults_to_two() {
        assert_eq!(DecisionVector::uniform(0).len(), DEFAULT_OUTCOME_COUNT);
    }

    #[test]
    fn test_normalize_percentages() {
        let v = DecisionVector::normalize(&[70.0, 30.0]).unwrap();
        assert_eq!(v.as_slice(), &[700_000, 300_000]);
    }

    #[test]
    fn test_normalize_thirds_is_exact() {
        let v = DecisionVector::normalize(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(v.total(), SCORE_SCALE);
        assert_eq!(v.as_slice(), &[333_334, 333_333, 333_333]);
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(DecisionVector::normalize(&[]).is_err());
        assert!(DecisionVector::normalize(&[0.0, 0.0]).is_err());
        assert!(DecisionVector::normalize(&[-1.0, 2.0]).is_err());
        assert!(DecisionVector::normalize(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_leader_prefers_first_on_tie() {
        assert_eq!(DecisionVector::uniform(2).leader(), Some(0));
        let v = DecisionVector::from_scores(vec![100, 900_000, 99_900]);
        assert_eq!(v.leader(), Some(1));
    }

    #[test]
    fn test_display() {
        let v = DecisionVector::from_scores(vec![550_000, 450_000]);
        assert_eq!(v.to_string(), "[550000, 450000]");
    }
}
