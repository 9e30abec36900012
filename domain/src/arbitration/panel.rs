//! Panel entries: the weighted models whose answers are aggregated.

use crate::core::error::ArbitrationError;
use crate::core::model::ModelRef;
use serde::{Deserialize, Serialize};

/// Upper bound on independent calls to one model per iteration
pub const MAX_CALLS_PER_MODEL: u32 = 32;

fn default_count() -> u32 {
    1
}

/// One weighted model on the panel
///
/// # Example
///
/// ```
/// use arbiter_domain::PanelEntry;
///
/// let entry = PanelEntry::new("anthropic", "claude-sonnet-4", 0.5).with_count(3);
/// assert_eq!(entry.count, 3);
/// assert_eq!(entry.model_ref().to_string(), "anthropic:claude-sonnet-4");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub provider: String,
    pub model: String,
    /// Share of the vote, in `[0, 1]`
    pub weight: f64,
    /// Independent calls made per iteration
    #[serde(default = "default_count")]
    pub count: u32,
}

impl PanelEntry {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, weight: f64) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            weight,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn model_ref(&self) -> ModelRef {
        ModelRef::new(&self.provider, &self.model)
    }

    /// "provider/model" label used in logs and feedback text
    pub fn label(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

/// Check a panel before any provider is contacted.
///
/// Every weight lies in `[0, 1]`, every count lies in
/// `[1, MAX_CALLS_PER_MODEL]` and the total weight lies in `(0, panel size]`.
pub fn validate_panel(panel: &[PanelEntry]) -> Result<(), ArbitrationError> {
    if panel.is_empty() {
        return Err(ArbitrationError::validation("at least one model is required"));
    }

    for entry in panel {
        if entry.provider.trim().is_empty() || entry.model.trim().is_empty() {
            return Err(ArbitrationError::validation(
                "every model needs a provider and a model name",
            ));
        }
        if !entry.weight.is_finite() || !(0.0..=1.0).contains(&entry.weight) {
            return Err(ArbitrationError::validation(format!(
                "weight for {} must be between 0 and 1, got {}",
                entry.label(),
                entry.weight
            )));
        }
        if entry.count == 0 {
            return Err(ArbitrationError::validation(format!(
                "count for {} must be at least 1",
                entry.label()
            )));
        }
        if entry.count > MAX_CALLS_PER_MODEL {
            return Err(ArbitrationError::validation(format!(
                "count for {} must be at most {}, got {}",
                entry.label(),
                MAX_CALLS_PER_MODEL,
                entry.count
            )));
        }
    }

    let total: f64 = panel.iter().map(|e| e.weight).sum();
    if total <= 0.0 || total > panel.len() as f64 {
        return Err(ArbitrationError::validation(format!(
            "total weight must be in (0, {}], got {}",
            panel.len(),
            total
        )));
    }

    Ok(())
}
