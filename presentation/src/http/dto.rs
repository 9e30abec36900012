//! Request and response bodies

use arbiter_application::OracleResponse;
use arbiter_domain::{Attachment, PanelEntry, QueryObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// `POST /rank-and-justify` body.
///
/// Missing fields default so that domain validation reports them.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub outcomes: Option<Vec<String>>,
    #[serde(default)]
    pub models: Vec<PanelEntry>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl RankRequest {
    pub fn into_query(self) -> QueryObject {
        QueryObject::new(self.prompt, self.models, self.iterations, self.outcomes)
            .with_attachments(self.attachments)
    }
}

/// `POST /evaluate` body as sent by the oracle node
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    /// Echoed back as `jobRunID`; any JSON value
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub data: EvaluateData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateData {
    #[serde(default)]
    pub cid: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleData {
    pub aggregated_score: Vec<u128>,
    #[serde(rename = "justificationCID", skip_serializing_if = "Option::is_none")]
    pub justification_cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Oracle adapter response, in both its success and errored shapes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleEnvelope {
    #[serde(rename = "jobRunID")]
    pub job_run_id: Value,
    pub status: &'static str,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OracleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OracleEnvelope {
    pub fn success(job_run_id: Value, response: OracleResponse) -> Self {
        Self {
            job_run_id,
            status: "success",
            status_code: 200,
            data: Some(OracleData {
                aggregated_score: response.aggregated_score,
                justification_cid: response.justification_cid,
                error: response.error,
            }),
            error: None,
        }
    }

    pub fn errored(job_run_id: Value, error: &ApiError) -> Self {
        Self {
            job_run_id,
            status: "errored",
            status_code: error.status.as_u16(),
            data: None,
            error: Some(error.message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_request_defaults() {
        let request: RankRequest = serde_json::from_value(json!({
            "prompt": "Who pays?",
            "models": [{"provider": "openai", "model": "gpt-4o", "weight": 1.0}]
        }))
        .unwrap();
        let query = request.into_query();
        assert_eq!(query.iterations, 1);
        assert_eq!(query.outcomes.len(), 2);
        assert_eq!(query.models[0].count, 1);
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = OracleEnvelope::success(
            json!("job-1"),
            OracleResponse {
                aggregated_score: vec![600_000, 400_000],
                justification_cid: Some("abc".into()),
                error: None,
            },
        );
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "jobRunID": "job-1",
                "status": "success",
                "statusCode": 200,
                "data": {"aggregatedScore": [600000, 400000], "justificationCID": "abc"}
            })
        );
    }

    #[test]
    fn test_commitment_serializes_as_plain_digits() {
        let envelope = OracleEnvelope::success(
            json!(7),
            OracleResponse {
                aggregated_score: vec![u128::MAX],
                justification_cid: None,
                error: None,
            },
        );
        let text = serde_json::to_string(&envelope).unwrap();
        assert!(text.contains(&format!("\"aggregatedScore\":[{}]", u128::MAX)));
        assert!(!text.contains("justificationCID"));
    }
}
