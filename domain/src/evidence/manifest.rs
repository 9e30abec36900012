//! Resolved evidence bundle description.

use crate::arbitration::{Attachment, PanelEntry};
use serde::{Deserialize, Serialize};

/// What a resolved evidence bundle contributes to a query.
///
/// A primary manifest supplies everything; a secondary manifest only
/// contributes its `prompt` text (as evidence) and its attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Bundle name, used to label secondary evidence
    pub name: Option<String>,
    /// Prompt template (primary) or evidentiary text (secondary)
    pub prompt: String,
    pub models: Vec<PanelEntry>,
    pub iterations: u32,
    pub outcomes: Option<Vec<String>>,
    pub attachments: Vec<Attachment>,
    /// Token in `prompt` replaced by the requester's addendum
    pub addendum_placeholder: Option<String>,
}

impl Manifest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            name: None,
            prompt: prompt.into(),
            models: Vec::new(),
            iterations: 1,
            outcomes: None,
            attachments: Vec::new(),
            addendum_placeholder: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_models(mut self, models: Vec<PanelEntry>) -> Self {
        self.models = models;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_outcomes(mut self, outcomes: Vec<String>) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_addendum_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.addendum_placeholder = Some(placeholder.into());
        self
    }
}
