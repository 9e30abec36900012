//! Prompt templates for the arbitration flow

use crate::arbitration::IterationFeedback;
use crate::decision::{DecisionVector, SCORE_SCALE};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    fn outcome_list(outcomes: &[String]) -> String {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}. {}", i + 1, o))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prompt sent to every panel model in a round.
    ///
    /// From round 2 on, the formatted responses of all earlier rounds are
    /// appended so models can converge.
    pub fn query(prompt: &str, outcomes: &[String], feedback: &IterationFeedback) -> String {
        let mut text = format!(
            r#"You are an impartial arbiter. Evaluate the scenario below and assign a likelihood to each possible outcome.

Scenario:
{}

Possible outcomes (in order):
{}

Respond with a single JSON object and nothing else:
{{"score": [<one non-negative integer per outcome, in the order above, summing to {}>], "justification": "<your reasoning>"}}"#,
            prompt.trim(),
            Self::outcome_list(outcomes),
            SCORE_SCALE
        );

        if !feedback.is_empty() {
            text.push_str(
                "\n\nOther arbiters have already answered in earlier rounds. Their responses follow.\n\
                 Reconsider your assessment in light of their reasoning; move toward agreement where their arguments are sound.\n",
            );
            for block in feedback.responses() {
                text.push('\n');
                text.push_str(block);
                text.push('\n');
            }
        }

        text
    }

    /// Prompt for the justifier: final scores plus every model's rationale
    pub fn justification(
        prompt: &str,
        outcomes: &[String],
        vector: &DecisionVector,
        justifications: &[String],
    ) -> String {
        let mut text = format!(
            r#"A panel of arbiters evaluated the following scenario:

{}

The panel's final scores (out of {}) are:
"#,
            prompt.trim(),
            SCORE_SCALE
        );

        for (outcome, score) in outcomes.iter().zip(vector.as_slice()) {
            text.push_str(&format!("- {}: {}\n", outcome, score));
        }

        text.push_str("\nIndividual arbiter justifications:\n");
        for justification in justifications {
            text.push_str(&format!("\n--- {}\n", justification.trim()));
        }

        text.push_str(
            r#"
Write one consolidated justification for the final scores. Explain the key evidence and where the arbiters agreed or disagreed. Do not mention individual model names."#,
        );

        text
    }

    /// Block appended to the primary prompt for a secondary evidence bundle
    pub fn secondary_evidence(index: usize, name: Option<&str>, text: &str) -> String {
        match name {
            Some(name) => format!(
                "\n\n--- Additional evidence #{} ({}) ---\n{}",
                index,
                name,
                text.trim()
            ),
            None => format!("\n\n--- Additional evidence #{} ---\n{}", index, text.trim()),
        }
    }

    /// Addendum appended when the prompt has no placeholder for it
    pub fn addendum(text: &str) -> String {
        format!("\n\nAddendum: {}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitration::{IterationState, ModelVerdict};

    fn outcomes() -> Vec<String> {
        vec!["Refund".to_string(), "No refund".to_string()]
    }

    #[test]
    fn test_first_round_has_no_feedback() {
        let prompt = PromptTemplate::query("Was the item damaged?", &outcomes(), &Default::default());
        assert!(prompt.contains("Was the item damaged?"));
        assert!(prompt.contains("1. Refund\n2. No refund"));
        assert!(prompt.contains("\"score\""));
        assert!(!prompt.contains("earlier rounds"));
    }

    #[test]
    fn test_later_round_includes_previous_responses() {
        let mut state = IterationState::new(1);
        state.push(ModelVerdict {
            provider: "openai".into(),
            model: "gpt-4o".into(),
            weight: 1.0,
            vector: DecisionVector::from_scores(vec![900_000, 100_000]),
            justification: "Photos show a crack.".into(),
            fallback_calls: 0,
        });
        let feedback = IterationFeedback::default().absorb(&state);

        let prompt = PromptTemplate::query("Was the item damaged?", &outcomes(), &feedback);
        assert!(prompt.contains("earlier rounds"));
        assert!(prompt.contains("openai/gpt-4o"));
        assert!(prompt.contains("Photos show a crack."));
    }

    #[test]
    fn test_justification_prompt_lists_scores_and_rationales() {
        let vector = DecisionVector::from_scores(vec![550_000, 450_000]);
        let prompt = PromptTemplate::justification(
            "Was the item damaged?",
            &outcomes(),
            &vector,
            &["openai/gpt-4o: crack visible".to_string()],
        );
        assert!(prompt.contains("- Refund: 550000"));
        assert!(prompt.contains("crack visible"));
    }

    #[test]
    fn test_secondary_evidence_block() {
        let block = PromptTemplate::secondary_evidence(2, Some("receipt"), " paid ");
        assert_eq!(block, "\n\n--- Additional evidence #2 (receipt) ---\npaid");
    }
}
