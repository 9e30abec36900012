//! Two-level reduction of decision vectors.
//!
//! 1. [`average_calls`]: the `count` answers of one panel entry are averaged
//!    slot-wise.
//! 2. [`weighted_mean`]: per-model vectors are combined with panel weights,
//!    normalized by the weight that actually took part.
//!
//! Both reductions round with the largest-remainder rule, so a set of
//! normalized inputs always yields a normalized output and every slot stays
//! within the range spanned by the inputs.

use super::vector::{DecisionVector, apportion};
use crate::core::error::ArbitrationError;

fn check_cardinality(vectors: &[&DecisionVector]) -> Result<usize, ArbitrationError> {
    let first = vectors
        .first()
        .ok_or_else(|| ArbitrationError::validation("nothing to aggregate"))?;
    let k = first.len();
    if k == 0 {
        return Err(ArbitrationError::validation("decision vectors are empty"));
    }
    if vectors.iter().any(|v| v.len() != k) {
        return Err(ArbitrationError::validation(
            "decision vectors differ in outcome count",
        ));
    }
    Ok(k)
}

/// Average the answers of repeated calls to one model.
///
/// Each slot is the floored mean; the units lost to flooring are handed back
/// to the slots with the largest remainders, matching the total of the mean.
pub fn average_calls(vectors: &[DecisionVector]) -> Result<DecisionVector, ArbitrationError> {
    let refs: Vec<&DecisionVector> = vectors.iter().collect();
    let k = check_cardinality(&refs)?;
    if vectors.len() == 1 {
        return Ok(vectors[0].clone());
    }

    let n = vectors.len() as u64;
    let sums: Vec<u64> = (0..k)
        .map(|j| vectors.iter().map(|v| v.as_slice()[j]).sum())
        .collect();
    let target = sums.iter().sum::<u64>() / n;

    let mut scores: Vec<u64> = sums.iter().map(|s| s / n).collect();
    let mut missing = target - scores.iter().sum::<u64>();

    let mut order: Vec<usize> = (0..k).filter(|&j| sums[j] % n > 0).collect();
    order.sort_by(|&a, &b| (sums[b] % n).cmp(&(sums[a] % n)).then(a.cmp(&b)));
    for j in order {
        if missing == 0 {
            break;
        }
        scores[j] += 1;
        missing -= 1;
    }

    Ok(DecisionVector::from_scores(scores))
}

/// Weighted mean across models: `Σ_i v_i[j]·w_i / Σ_i w_i`.
///
/// Weights are the panel weights of the entries that answered in this
/// iteration; their total must be positive.
pub fn weighted_mean(
    inputs: &[(&DecisionVector, f64)],
) -> Result<DecisionVector, ArbitrationError> {
    let vectors: Vec<&DecisionVector> = inputs.iter().map(|(v, _)| *v).collect();
    let k = check_cardinality(&vectors)?;

    if inputs.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Err(ArbitrationError::validation(
            "weights must be finite and non-negative",
        ));
    }
    let total_weight: f64 = inputs.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return Err(ArbitrationError::validation(
            "total active weight must be positive",
        ));
    }

    let means: Vec<f64> = (0..k)
        .map(|j| {
            inputs
                .iter()
                .map(|(v, w)| v.as_slice()[j] as f64 * w)
                .sum::<f64>()
                / total_weight
        })
        .collect();
    let target = means.iter().sum::<f64>().round() as u64;

    Ok(DecisionVector::from_scores(apportion(&means, target)))
}
