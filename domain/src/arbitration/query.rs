//! The query object: everything one arbitration run needs.

use super::panel::{PanelEntry, validate_panel};
use crate::core::error::ArbitrationError;
use crate::decision::DEFAULT_OUTCOME_COUNT;
use serde::{Deserialize, Serialize};

/// A file handed to models that accept attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// MIME type, e.g. `image/png`
    pub media_type: String,
    /// Base64-encoded content
    pub data: String,
}

impl Attachment {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Upper bound on the number of outcomes one query may rank
pub const MAX_OUTCOMES: usize = 64;

/// Labels used when the requester names no outcomes
pub fn default_outcomes(k: usize) -> Vec<String> {
    (1..=k).map(|i| format!("outcome{}", i)).collect()
}

/// Immutable description of one arbitration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryObject {
    pub prompt: String,
    pub models: Vec<PanelEntry>,
    pub iterations: u32,
    pub outcomes: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl QueryObject {
    /// Build a query; missing outcomes become two unnamed outcomes and a
    /// missing iteration count becomes one round.
    pub fn new(
        prompt: impl Into<String>,
        models: Vec<PanelEntry>,
        iterations: Option<u32>,
        outcomes: Option<Vec<String>>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            models,
            iterations: iterations.unwrap_or(1),
            outcomes: outcomes
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| default_outcomes(DEFAULT_OUTCOME_COUNT)),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Reject malformed requests before any provider call is made
    pub fn validate(&self) -> Result<(), ArbitrationError> {
        if self.prompt.trim().is_empty() {
            return Err(ArbitrationError::validation("prompt is required"));
        }
        if self.iterations == 0 {
            return Err(ArbitrationError::validation("iterations must be at least 1"));
        }
        if self.outcomes.is_empty() {
            return Err(ArbitrationError::validation("at least one outcome is required"));
        }
        if self.outcomes.len() > MAX_OUTCOMES {
            return Err(ArbitrationError::validation(format!(
                "at most {} outcomes are allowed, got {}",
                MAX_OUTCOMES,
                self.outcomes.len()
            )));
        }
        validate_panel(&self.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Vec<PanelEntry> {
        vec![PanelEntry::new("openai", "gpt-4o", 1.0)]
    }

    #[test]
    fn test_defaults() {
        let query = QueryObject::new("Who is liable?", panel(), None, None);
        assert_eq!(query.iterations, 1);
        assert_eq!(query.outcomes, vec!["outcome1", "outcome2"]);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_empty_outcome_list_is_defaulted() {
        let query = QueryObject::new("q", panel(), Some(2), Some(vec![]));
        assert_eq!(query.outcome_count(), 2);
    }

    #[test]
    fn test_validate_missing_prompt_and_models() {
        assert!(QueryObject::new("  ", panel(), None, None).validate().is_err());
        assert!(QueryObject::new("q", vec![], None, None).validate().is_err());
        assert!(QueryObject::new("q", panel(), Some(0), None).validate().is_err());
    }

    #[test]
    fn test_validate_outcome_bound() {
        let at_bound = QueryObject::new("q", panel(), None, Some(default_outcomes(MAX_OUTCOMES)));
        assert!(at_bound.validate().is_ok());

        let over = QueryObject::new("q", panel(), None, Some(default_outcomes(MAX_OUTCOMES + 1)));
        assert!(matches!(over.validate(), Err(ArbitrationError::Validation(_))));
    }

    #[test]
    fn test_attachment_kind() {
        assert!(Attachment::new("a.png", "image/png", "AAAA").is_image());
        assert!(!Attachment::new("a.txt", "text/plain", "AAAA").is_image());
    }
}
