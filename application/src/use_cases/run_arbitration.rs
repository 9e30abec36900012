//! Run Arbitration use case
//!
//! Drives the refinement rounds of one query: every panel entry is asked
//! `count` times per round, calls are averaged per model, models are
//! combined by weighted mean, and the final round's aggregate is handed to
//! the justifier.

use crate::config::ArbiterConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{ArbitrationProgress, NoProgress};
use crate::ports::provider_gateway::ProviderGateway;
use arbiter_domain::decision::{average_calls, parse_or_fallback};
use arbiter_domain::{
    ArbitrationError, ArbitrationResult, DecisionVector, IterationFeedback, IterationState,
    IterationStep, ModelVerdict, PanelEntry, PromptTemplate, QueryObject,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for running one arbitration
pub struct RunArbitrationUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
    config: ArbiterConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: ProviderGateway + 'static> RunArbitrationUseCase<G> {
    pub fn new(gateway: Arc<G>, config: ArbiterConfig) -> Self {
        Self {
            gateway,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, query: &QueryObject) -> Result<ArbitrationResult, ArbitrationError> {
        self.execute_with_progress(query, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Any provider failure aborts the run: no partial scores are returned.
    pub async fn execute_with_progress(
        &self,
        query: &QueryObject,
        progress: &dyn ArbitrationProgress,
    ) -> Result<ArbitrationResult, ArbitrationError> {
        query.validate()?;

        info!(
            "Starting arbitration: {} models, {} iteration(s), {} outcomes",
            query.models.len(),
            query.iterations,
            query.outcome_count()
        );

        let mut feedback = IterationFeedback::default();
        let mut outcome: Option<ArbitrationResult> = None;
        let mut step = IterationStep::start(query.iterations);

        while let IterationStep::Running { iteration, total } = step {
            progress.on_iteration_start(iteration, total, query.models.len());
            let state = self.run_iteration(query, iteration, &feedback, progress).await?;
            let aggregate = state.aggregate()?;

            info!("Iteration {}/{} aggregate: {}", iteration, total, aggregate);
            self.conversation_logger.log(ConversationEvent::new(
                "iteration_aggregate",
                json!({
                    "iteration": iteration,
                    "aggregate": aggregate.as_slice(),
                    "weights": state.weights(),
                }),
            ));
            progress.on_iteration_complete(iteration, &aggregate);

            if step.is_final() {
                let justification = self
                    .justify(query, &aggregate, &state.justifications(), progress)
                    .await;
                outcome = Some(ArbitrationResult::from_vector(
                    &query.outcomes,
                    &aggregate,
                    justification,
                ));
            } else {
                feedback = feedback.absorb(&state);
            }
            step = step.advance();
        }

        outcome.ok_or_else(|| ArbitrationError::validation("iterations must be at least 1"))
    }

    /// One round: every panel entry in configured order, one after another
    async fn run_iteration(
        &self,
        query: &QueryObject,
        iteration: u32,
        feedback: &IterationFeedback,
        progress: &dyn ArbitrationProgress,
    ) -> Result<IterationState, ArbitrationError> {
        let prompt = PromptTemplate::query(&query.prompt, &query.outcomes, feedback);
        let mut state = IterationState::new(iteration);

        for entry in &query.models {
            let verdict = self.query_entry(query, entry, &prompt, iteration).await?;
            progress.on_model_complete(iteration, &verdict);
            state.push(verdict);
        }

        Ok(state)
    }

    /// Ask one panel entry `count` times and average its answers
    async fn query_entry(
        &self,
        query: &QueryObject,
        entry: &PanelEntry,
        prompt: &str,
        iteration: u32,
    ) -> Result<ModelVerdict, ArbitrationError> {
        let model = entry.model_ref();
        let with_attachments =
            query.has_attachments() && self.gateway.supports_attachments(&model);
        if query.has_attachments() && !with_attachments {
            debug!("{} does not accept attachments; sending text only", model);
        }

        let mut vectors = Vec::new();
        let mut justifications = Vec::new();
        let mut fallback_calls = 0;

        for call in 1..=entry.count {
            let response = if with_attachments {
                self.gateway
                    .generate_with_attachments(&model, prompt, &query.attachments)
                    .await
            } else {
                self.gateway.generate(&model, prompt).await
            };

            let raw = response.map_err(|e| {
                warn!("Model {} failed in iteration {}: {}", model, iteration, e);
                e.into_arbitration_error(&model)
            })?;

            let decision = parse_or_fallback(&raw, &query.outcomes);
            if decision.fallback {
                fallback_calls += 1;
                warn!(
                    "Model {} call {} returned unparseable output; using uniform fallback",
                    model, call
                );
            }

            self.conversation_logger.log(ConversationEvent::new(
                "model_response",
                json!({
                    "iteration": iteration,
                    "provider": entry.provider,
                    "model": entry.model,
                    "call": call,
                    "attachments": with_attachments,
                    "prompt": prompt,
                    "response": raw,
                    "vector": decision.vector.as_slice(),
                    "fallback": decision.fallback,
                }),
            ));

            vectors.push(decision.vector);
            justifications.push(decision.justification);
        }

        let vector = average_calls(&vectors)?;
        debug!("Model {} averaged over {} call(s): {}", model, entry.count, vector);

        Ok(ModelVerdict {
            provider: entry.provider.clone(),
            model: entry.model.clone(),
            weight: entry.weight,
            vector,
            justification: justifications.join("\n"),
            fallback_calls,
        })
    }

    /// Consolidate the final round's rationales; never fails the run
    async fn justify(
        &self,
        query: &QueryObject,
        aggregate: &DecisionVector,
        justifications: &[String],
        progress: &dyn ArbitrationProgress,
    ) -> String {
        let justifier = &self.config.justifier;
        let prompt =
            PromptTemplate::justification(&query.prompt, &query.outcomes, aggregate, justifications);

        let justification = match self.gateway.generate(justifier, &prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Justifier {} returned an empty answer", justifier);
                None
            }
            Err(e) => {
                warn!("Justifier {} failed: {}", justifier, e);
                None
            }
        };

        progress.on_justification(justification.is_some());
        self.conversation_logger.log(ConversationEvent::new(
            "justification",
            json!({
                "model": justifier.to_string(),
                "success": justification.is_some(),
                "text": justification,
            }),
        ));

        justification.unwrap_or_else(|| self.config.justification_placeholder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_gateway::{GatewayError, ModelInfo};
    use arbiter_domain::{Attachment, ErrorKind, ModelRef};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // ==================== Mock Gateway ====================

    /// Scripted gateway: each model answers from its own queue
    #[derive(Default)]
    struct ScriptedGateway {
        scripts: Mutex<HashMap<String, VecDeque<Result<String, GatewayError>>>>,
        prompts: Mutex<Vec<(String, String)>>,
        attachment_calls: Mutex<Vec<String>>,
        attachment_models: Vec<String>,
    }

    impl ScriptedGateway {
        fn script(self, model: &str, answers: Vec<Result<String, GatewayError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(model.to_string(), answers.into());
            self
        }

        fn with_attachment_model(mut self, model: &str) -> Self {
            self.attachment_models.push(model.to_string());
            self
        }

        fn next(&self, model: &ModelRef, prompt: &str) -> Result<String, GatewayError> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&model.to_string())
                .and_then(|q| q.pop_front())
                .unwrap_or_else(|| Err(GatewayError::ModelNotAvailable(model.to_string())))
        }

        fn prompts_for(&self, model: &str) -> Vec<String> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == model)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ProviderGateway for ScriptedGateway {
        fn providers(&self) -> Vec<String> {
            vec!["test".to_string()]
        }

        async fn available_models(&self, _provider: &str) -> Result<Vec<ModelInfo>, GatewayError> {
            Ok(vec![])
        }

        async fn generate(&self, model: &ModelRef, prompt: &str) -> Result<String, GatewayError> {
            self.next(model, prompt)
        }

        async fn generate_with_attachments(
            &self,
            model: &ModelRef,
            prompt: &str,
            _attachments: &[Attachment],
        ) -> Result<String, GatewayError> {
            self.attachment_calls
                .lock()
                .unwrap()
                .push(model.to_string());
            self.next(model, prompt)
        }

        fn supports_attachments(&self, model: &ModelRef) -> bool {
            self.attachment_models.contains(&model.to_string())
        }
    }

    // ==================== Helpers ====================

    const JUSTIFIER: &str = "test:judge";

    fn answer(scores: [u64; 2], why: &str) -> Result<String, GatewayError> {
        Ok(format!(
            r#"{{"score": [{}, {}], "justification": "{}"}}"#,
            scores[0], scores[1], why
        ))
    }

    fn config() -> ArbiterConfig {
        ArbiterConfig::default().with_justifier(JUSTIFIER.parse().unwrap())
    }

    fn query(models: Vec<PanelEntry>, iterations: u32) -> QueryObject {
        QueryObject::new("Was the parcel delivered?", models, Some(iterations), None)
    }

    fn use_case(gateway: ScriptedGateway) -> (RunArbitrationUseCase<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        (RunArbitrationUseCase::new(Arc::clone(&gateway), config()), gateway)
    }

    // ==================== Aggregation ====================

    #[tokio::test]
    async fn test_equal_weights_average_two_models() {
        let gateway = ScriptedGateway::default()
            .script("test:a", vec![answer([700_000, 300_000], "tracking shows delivery")])
            .script("test:b", vec![answer([400_000, 600_000], "no signature")])
            .script(JUSTIFIER, vec![Ok("Delivery is more likely than not.".into())]);
        let (use_case, _) = use_case(gateway);

        let q = query(
            vec![
                PanelEntry::new("test", "a", 0.5),
                PanelEntry::new("test", "b", 0.5),
            ],
            1,
        );
        let result = use_case.execute(&q).await.unwrap();

        assert_eq!(result.vector().as_slice(), &[550_000, 450_000]);
        assert_eq!(result.scores[0].outcome, "outcome1");
        assert_eq!(result.justification, "Delivery is more likely than not.");
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back_to_uniform() {
        let gateway = ScriptedGateway::default()
            .script("test:a", vec![Ok("I refuse to answer in JSON.".into())])
            .script(JUSTIFIER, vec![Ok("Inconclusive.".into())]);
        let (use_case, gateway) = use_case(gateway);

        let result = use_case
            .execute(&query(vec![PanelEntry::new("test", "a", 1.0)], 1))
            .await
            .unwrap();

        assert_eq!(result.vector().as_slice(), &[500_000, 500_000]);
        let justifier_prompt = gateway.prompts_for(JUSTIFIER).remove(0);
        assert!(justifier_prompt.contains("[LLM_ERROR]"));
        assert!(justifier_prompt.contains("I refuse to answer in JSON."));
    }

    #[tokio::test]
    async fn test_count_calls_are_averaged() {
        let gateway = ScriptedGateway::default()
            .script(
                "test:a",
                vec![
                    answer([1_000_000, 0], "first"),
                    answer([0, 1_000_000], "second"),
                    answer([0, 1_000_000], "third"),
                ],
            )
            .script(JUSTIFIER, vec![Ok("Split.".into())]);
        let (use_case, gateway) = use_case(gateway);

        let result = use_case
            .execute(&query(vec![PanelEntry::new("test", "a", 1.0).with_count(3)], 1))
            .await
            .unwrap();

        assert_eq!(gateway.prompts_for("test:a").len(), 3);
        let vector = result.vector();
        assert_eq!(vector.total(), 1_000_000);
        assert_eq!(vector.as_slice(), &[333_333, 666_667]);
    }

    // ==================== Iterations ====================

    #[tokio::test]
    async fn test_later_rounds_see_earlier_answers_and_only_last_counts() {
        let gateway = ScriptedGateway::default()
            .script(
                "test:a",
                vec![
                    answer([900_000, 100_000], "round one view"),
                    answer([600_000, 400_000], "round two view"),
                ],
            )
            .script(JUSTIFIER, vec![Ok("Final.".into())]);
        let (use_case, gateway) = use_case(gateway);

        let result = use_case
            .execute(&query(vec![PanelEntry::new("test", "a", 1.0)], 2))
            .await
            .unwrap();

        let prompts = gateway.prompts_for("test:a");
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains("round one view"));
        assert!(prompts[1].contains("Iteration 1:"));
        assert!(prompts[1].contains("round one view"));

        assert_eq!(result.vector().as_slice(), &[600_000, 400_000]);
        assert_eq!(gateway.prompts_for(JUSTIFIER).len(), 1);
        assert!(gateway.prompts_for(JUSTIFIER)[0].contains("round two view"));
    }

    // ==================== Failure policy ====================

    #[tokio::test]
    async fn test_provider_error_aborts_the_run() {
        let gateway = ScriptedGateway::default()
            .script("test:a", vec![answer([700_000, 300_000], "fine")])
            .script("test:b", vec![Err(GatewayError::Timeout)]);
        let (use_case, gateway) = use_case(gateway);

        let error = use_case
            .execute(&query(
                vec![
                    PanelEntry::new("test", "a", 0.5),
                    PanelEntry::new("test", "b", 0.5),
                ],
                1,
            ))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Provider);
        assert!(matches!(
            error,
            ArbitrationError::Provider { ref model, .. } if model == "b"
        ));
        assert!(gateway.prompts_for(JUSTIFIER).is_empty());
    }

    #[tokio::test]
    async fn test_justifier_failure_uses_placeholder() {
        let gateway = ScriptedGateway::default()
            .script("test:a", vec![answer([200_000, 800_000], "late")])
            .script(JUSTIFIER, vec![Err(GatewayError::RequestFailed("503".into()))]);
        let (use_case, _) = use_case(gateway);

        let result = use_case
            .execute(&query(vec![PanelEntry::new("test", "a", 1.0)], 1))
            .await
            .unwrap();

        assert_eq!(result.vector().as_slice(), &[200_000, 800_000]);
        assert_eq!(
            result.justification,
            ArbiterConfig::default().justification_placeholder
        );
    }

    #[tokio::test]
    async fn test_invalid_panel_is_rejected_before_any_call() {
        let (use_case, gateway) = use_case(ScriptedGateway::default());

        let error = use_case
            .execute(&query(vec![PanelEntry::new("test", "a", 1.5)], 1))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_count_is_rejected_before_any_call() {
        let (use_case, gateway) = use_case(ScriptedGateway::default());

        let error = use_case
            .execute(&query(
                vec![PanelEntry::new("test", "a", 1.0).with_count(u32::MAX)],
                1,
            ))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }

    // ==================== Attachments ====================

    #[tokio::test]
    async fn test_attachments_only_sent_to_capable_models() {
        let gateway = ScriptedGateway::default()
            .with_attachment_model("test:vision")
            .script("test:vision", vec![answer([500_000, 500_000], "saw photo")])
            .script("test:text", vec![answer([500_000, 500_000], "read text")])
            .script(JUSTIFIER, vec![Ok("Even.".into())]);
        let (use_case, gateway) = use_case(gateway);

        let q = query(
            vec![
                PanelEntry::new("test", "vision", 0.5),
                PanelEntry::new("test", "text", 0.5),
            ],
            1,
        )
        .with_attachments(vec![Attachment::new("photo.png", "image/png", "AAAA")]);
        use_case.execute(&q).await.unwrap();

        assert_eq!(
            *gateway.attachment_calls.lock().unwrap(),
            vec!["test:vision".to_string()]
        );
    }
}
