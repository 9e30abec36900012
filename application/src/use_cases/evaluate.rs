//! Evaluate use case (oracle-facing)
//!
//! Dispatches a request string on its protocol mode:
//!
//! | Mode | Work | `aggregated_score` |
//! |------|------|--------------------|
//! | Standard | build query, arbitrate, publish | the decision vector |
//! | Commit | build query, arbitrate, store sealed result | `[commitment]` |
//! | Reveal | take stored result, publish | the stored decision vector |
//!
//! Provider failures in standard and commit mode do not fail the request:
//! they produce `[0]` plus the error text, so the consumer always receives
//! a parseable fulfillment.

use super::build_query::BuildQueryUseCase;
use super::commitment::CommitmentManager;
use super::run_arbitration::RunArbitrationUseCase;
use crate::ports::content_publisher::ContentPublisher;
use crate::ports::provider_gateway::ProviderGateway;
use arbiter_domain::util::current_timestamp_millis;
use arbiter_domain::{
    ArbitrationError, ArbitrationResult, EvidenceRequest, JustificationRecord, ProtocolRequest,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Data returned to the oracle consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse {
    pub aggregated_score: Vec<u128>,
    pub justification_cid: Option<String>,
    /// Set when a provider failure was downgraded to a zero score
    pub error: Option<String>,
}

impl OracleResponse {
    fn scores(result: &ArbitrationResult, justification_cid: String) -> Self {
        Self {
            aggregated_score: result.scores.iter().map(|s| s.score as u128).collect(),
            justification_cid: Some(justification_cid),
            error: None,
        }
    }

    fn provider_failure(error: String, justification_cid: Option<String>) -> Self {
        Self {
            aggregated_score: vec![0],
            justification_cid,
            error: Some(error),
        }
    }
}

pub struct EvaluateUseCase<G: ProviderGateway + 'static> {
    arbitration: Arc<RunArbitrationUseCase<G>>,
    build_query: BuildQueryUseCase,
    commitments: CommitmentManager,
    publisher: Arc<dyn ContentPublisher>,
}

impl<G: ProviderGateway + 'static> EvaluateUseCase<G> {
    pub fn new(
        arbitration: Arc<RunArbitrationUseCase<G>>,
        build_query: BuildQueryUseCase,
        commitments: CommitmentManager,
        publisher: Arc<dyn ContentPublisher>,
    ) -> Self {
        Self {
            arbitration,
            build_query,
            commitments,
            publisher,
        }
    }

    pub async fn execute(&self, cid: &str) -> Result<OracleResponse, ArbitrationError> {
        let request: ProtocolRequest = cid.parse()?;
        info!("Oracle request in {} mode", request.mode().as_str());

        match request {
            ProtocolRequest::Standard(evidence) => {
                let result = match self.arbitrate(&evidence).await {
                    Ok(result) => result,
                    Err(e) if e.is_provider() => return Ok(self.soft_failure(e).await),
                    Err(e) => return Err(e),
                };
                let cid = self.publish(&JustificationRecord::from_result(
                    &result,
                    current_timestamp_millis(),
                ))
                .await?;
                Ok(OracleResponse::scores(&result, cid))
            }
            ProtocolRequest::Commit(evidence) => {
                let result = match self.arbitrate(&evidence).await {
                    Ok(result) => result,
                    Err(e) if e.is_provider() => return Ok(self.soft_failure(e).await),
                    Err(e) => return Err(e),
                };
                let hash = self.commitments.commit(result).await?;
                Ok(OracleResponse {
                    aggregated_score: vec![hash.as_u128()],
                    justification_cid: None,
                    error: None,
                })
            }
            ProtocolRequest::Reveal(hash) => {
                let commitment = self.commitments.reveal(&hash).await?;
                let record =
                    JustificationRecord::from_result(&commitment.result, current_timestamp_millis());

                let response = match self.publish(&record).await {
                    Ok(cid) => Ok(OracleResponse::scores(&commitment.result, cid)),
                    Err(e) => {
                        warn!("Publishing revealed commitment {} failed: {}", hash, e);
                        if let Err(restore) = self.commitments.restore(commitment).await {
                            error!("Could not restore commitment {}: {}", hash, restore);
                        }
                        Err(e)
                    }
                };
                self.commitments.spawn_purge();
                response
            }
        }
    }

    async fn arbitrate(&self, evidence: &EvidenceRequest) -> Result<ArbitrationResult, ArbitrationError> {
        let query = self.build_query.execute(evidence).await?;
        self.arbitration.execute(&query).await
    }

    async fn publish(&self, record: &JustificationRecord) -> Result<String, ArbitrationError> {
        let bytes = serde_json::to_vec(record)
            .map_err(|e| ArbitrationError::infrastructure(format!("serialize record: {}", e)))?;
        let cid = self.publisher.publish(&bytes).await?;
        info!("Published justification {}", cid);
        Ok(cid)
    }

    /// Zero score plus the error text; the error record is published when possible
    async fn soft_failure(&self, error: ArbitrationError) -> OracleResponse {
        let message = error.to_string();
        warn!("Arbitration failed at a provider: {}", message);

        let record = JustificationRecord::from_error(message.clone(), current_timestamp_millis());
        let cid = match self.publish(&record).await {
            Ok(cid) => Some(cid),
            Err(e) => {
                warn!("Could not publish error record: {}", e);
                None
            }
        };
        OracleResponse::provider_failure(message, cid)
    }
}
