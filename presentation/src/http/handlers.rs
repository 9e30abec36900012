use super::dto::{EvaluateRequest, OracleEnvelope, RankRequest};
use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::progress::reporter::TracingProgress;
use arbiter_application::{ModelInfo, ProviderGateway};
use arbiter_domain::ArbitrationResult;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{info, warn};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_models<G: ProviderGateway + 'static>(
    State(state): State<AppState<G>>,
) -> Json<Vec<ModelInfo>> {
    Json(state.models.execute().await)
}

pub async fn rank_and_justify<G: ProviderGateway + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> ApiResult<Json<ArbitrationResult>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = request.into_query();
    let result = state
        .arbitration
        .execute_with_progress(&query, &TracingProgress)
        .await?;
    Ok(Json(result))
}

/// Oracle adapter. Every outcome, including errors, is an [`OracleEnvelope`].
pub async fn evaluate<G: ProviderGateway + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => return errored(Value::Null, ApiError::bad_request(e.body_text())),
    };

    let job_run_id = request.id;
    let Some(cid) = request.data.cid.filter(|c| !c.trim().is_empty()) else {
        return errored(job_run_id, ApiError::bad_request("missing evidence identifier"));
    };

    info!("Evaluate job {}: {}", job_run_id, cid);
    match state.evaluate.execute(&cid).await {
        Ok(response) => {
            if let Some(error) = &response.error {
                warn!("Job {} completed with provider error: {}", job_run_id, error);
            }
            (
                StatusCode::OK,
                Json(OracleEnvelope::success(job_run_id, response)),
            )
                .into_response()
        }
        Err(e) => errored(job_run_id, ApiError::from(e)),
    }
}

fn errored(job_run_id: Value, error: ApiError) -> Response {
    warn!("Job {} errored: {} {}", job_run_id, error.status, error.message);
    (error.status, Json(OracleEnvelope::errored(job_run_id, &error))).into_response()
}
