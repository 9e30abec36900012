//! Decision response parsing.
//!
//! Extracts a decision vector and a justification from free-form model
//! output. Pure text handling: no I/O, no provider knowledge.
//!
//! # Accepted shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | JSON array score | `{"score": [700000, 300000], "justification": "..."}` |
//! | Percentages / probabilities | `{"score": [0.7, 0.3], ...}` (rescaled) |
//! | Labelled score | `{"score": {"Yes": 70, "No": 30}, ...}` (needs outcome labels) |
//! | Fenced JSON | a ```` ```json ```` block anywhere in the text |
//!
//! Anything else falls back to the uniform distribution (see
//! [`parse_or_fallback`]); a parse failure never aborts a request.

use super::vector::DecisionVector;
use crate::core::error::ArbitrationError;
use crate::util::truncate_str;
use serde_json::Value;

/// Longest raw model output echoed into a synthesized error justification
const MAX_RAW_ECHO_BYTES: usize = 2_000;

/// Tag marking a justification synthesized because the model output was unusable
pub const LLM_ERROR_TAG: &str = "[LLM_ERROR]";

/// A successfully decoded model answer
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDecision {
    pub vector: DecisionVector,
    pub justification: String,
}

/// The contribution of one model call after the fallback policy ran
#[derive(Debug, Clone, PartialEq)]
pub struct CallDecision {
    pub vector: DecisionVector,
    pub justification: String,
    /// Whether the uniform fallback replaced an unparseable answer
    pub fallback: bool,
}

/// Parse a model response into a decision vector and justification.
///
/// `outcomes` is the expected outcome label list; when non-empty the score
/// cardinality must match it and labelled score objects are resolved
/// against it.
pub fn parse_decision_response(
    response: &str,
    outcomes: &[String],
) -> Result<ParsedDecision, ArbitrationError> {
    let value = extract_json_object(response)
        .ok_or_else(|| ArbitrationError::Parse("no JSON object in response".to_string()))?;

    let justification = extract_justification(&value).unwrap_or_default();
    let raw_scores = extract_scores(&value, outcomes)?;

    if !outcomes.is_empty() && raw_scores.len() != outcomes.len() {
        return Err(ArbitrationError::Parse(format!(
            "expected {} scores, got {}",
            outcomes.len(),
            raw_scores.len()
        )));
    }

    Ok(ParsedDecision {
        vector: DecisionVector::normalize(&raw_scores)?,
        justification,
    })
}

/// Parse a response, applying the uniform fallback when decoding fails.
///
/// A justification the model did provide is kept even when its scores were
/// unusable; otherwise an [`LLM_ERROR_TAG`] record carrying the raw text is
/// synthesized so the failure stays auditable.
pub fn parse_or_fallback(response: &str, outcomes: &[String]) -> CallDecision {
    match parse_decision_response(response, outcomes) {
        Ok(parsed) => CallDecision {
            vector: parsed.vector,
            justification: parsed.justification,
            fallback: false,
        },
        Err(err) => {
            let justification = extract_json_object(response)
                .and_then(|v| extract_justification(&v))
                .filter(|j| !j.trim().is_empty())
                .unwrap_or_else(|| llm_error_justification(&err, response));
            CallDecision {
                vector: DecisionVector::uniform(outcomes.len()),
                justification,
                fallback: true,
            }
        }
    }
}

fn llm_error_justification(err: &ArbitrationError, response: &str) -> String {
    let raw = truncate_str(response.trim(), MAX_RAW_ECHO_BYTES);
    format!("{} {}. Raw output: {}", LLM_ERROR_TAG, err, raw)
}

/// Find the first decodable JSON object: whole text, fenced block, then outermost braces.
fn extract_json_object(response: &str) -> Option<Value> {
    let trimmed = response.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(fenced) = fenced_block(trimmed)
        && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(fenced)
    {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip an optional language tag on the opening line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn extract_justification(value: &Value) -> Option<String> {
    ["justification", "reasoning", "explanation"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
}

fn extract_scores(value: &Value, outcomes: &[String]) -> Result<Vec<f64>, ArbitrationError> {
    let scores = ["score", "scores", "decision"]
        .iter()
        .find_map(|key| value.get(*key))
        .ok_or_else(|| ArbitrationError::Parse("missing score field".to_string()))?;

    match scores {
        Value::Array(items) => items.iter().map(number).collect(),
        Value::Object(map) if !outcomes.is_empty() => outcomes
            .iter()
            .map(|label| {
                map.get(label)
                    .ok_or_else(|| {
                        ArbitrationError::Parse(format!("missing score for outcome '{}'", label))
                    })
                    .and_then(number)
            })
            .collect(),
        _ => Err(ArbitrationError::Parse(
            "score must be an array of numbers".to_string(),
        )),
    }
}

fn number(value: &Value) -> Result<f64, ArbitrationError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ArbitrationError::Parse(format!("not a number: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_plain_json() {
        let response = r#"{"score": [700000, 300000], "justification": "Clause 4 was breached."}"#;
        let parsed = parse_decision_response(response, &labels(&["Yes", "No"])).unwrap();
        assert_eq!(parsed.vector.as_slice(), &[700_000, 300_000]);
        assert_eq!(parsed.justification, "Clause 4 was breached.");
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let response = r#"
After weighing the evidence:
```json
{"score": [0.25, 0.75], "justification": "Delivery was late."}
```
That is my answer.
"#;
        let parsed = parse_decision_response(response, &[]).unwrap();
        assert_eq!(parsed.vector.as_slice(), &[250_000, 750_000]);
    }

    #[test]
    fn test_parse_labelled_scores() {
        let response = r#"{"score": {"No": 40, "Yes": 60}, "reasoning": "ok"}"#;
        let parsed = parse_decision_response(response, &labels(&["Yes", "No"])).unwrap();
        assert_eq!(parsed.vector.as_slice(), &[600_000, 400_000]);
        assert_eq!(parsed.justification, "ok");
    }

    #[test]
    fn test_parse_rejects_wrong_cardinality() {
        let response = r#"{"score": [1, 2, 3], "justification": "x"}"#;
        assert!(parse_decision_response(response, &labels(&["a", "b"])).is_err());
    }

    #[test]
    fn test_fallback_on_prose() {
        let decision = parse_or_fallback("I think the seller is right.", &labels(&["a", "b"]));
        assert!(decision.fallback);
        assert_eq!(decision.vector.as_slice(), &[500_000, 500_000]);
        assert!(decision.justification.starts_with(LLM_ERROR_TAG));
        assert!(decision.justification.contains("I think the seller is right."));
    }

    #[test]
    fn test_fallback_keeps_model_justification() {
        let response = r#"{"score": "high", "justification": "The buyer never paid."}"#;
        let decision = parse_or_fallback(response, &labels(&["a", "b", "c"]));
        assert!(decision.fallback);
        assert_eq!(decision.vector.total(), 1_000_000);
        assert_eq!(decision.justification, "The buyer never paid.");
    }

    #[test]
    fn test_fallback_without_known_outcomes_uses_two_slots() {
        let decision = parse_or_fallback("", &[]);
        assert_eq!(decision.vector.as_slice(), &[500_000, 500_000]);
    }
}
