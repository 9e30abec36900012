//! Content publisher port
//!
//! Publishes justification records to content-addressed storage.

use arbiter_domain::ArbitrationError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publish rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PublishError> for ArbitrationError {
    fn from(error: PublishError) -> Self {
        ArbitrationError::infrastructure(error.to_string())
    }
}

#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Store `bytes` and return the content identifier they can be fetched by
    async fn publish(&self, bytes: &[u8]) -> Result<String, PublishError>;
}
