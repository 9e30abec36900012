//! Error responses for the JSON endpoints

use arbiter_domain::{ArbitrationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: Some(ErrorKind::Validation),
            message: message.into(),
        }
    }

    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::CommitmentNotFound => StatusCode::NOT_FOUND,
            ErrorKind::Provider => StatusCode::BAD_GATEWAY,
            ErrorKind::Parse | ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ArbitrationError> for ApiError {
    fn from(error: ArbitrationError) -> Self {
        let kind = error.kind();
        Self {
            status: Self::status_for(kind),
            kind: Some(kind),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{} {}", self.status, self.message);
        } else {
            warn!("{} {}", self.status, self.message);
        }

        let mut body = json!({ "error": self.message });
        if let Some(kind) = self.kind {
            body["kind"] = json!(kind.as_str());
        }
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
