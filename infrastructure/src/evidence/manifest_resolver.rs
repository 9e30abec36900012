//! `manifest.json` evidence bundle format.
//!
//! ```json
//! {
//!   "name": "delivery-dispute",
//!   "primary": { "filename": "query.json" },
//!   "juryParameters": {
//!     "NUMBER_OF_OUTCOMES": 2,
//!     "AI_NODES": [
//!       { "AI_PROVIDER": "openai", "AI_MODEL": "gpt-4o", "NO_COUNTS": 1, "WEIGHT": 0.5 }
//!     ],
//!     "ITERATIONS": 1
//!   },
//!   "additional": [{ "name": "photo", "filename": "photo.png" }, "receipt.txt"],
//!   "addendum": "{{ADDENDUM}}"
//! }
//! ```
//!
//! The primary file is either a JSON object `{"query": ..., "outcomes": [...]}`
//! or plain text used verbatim as the prompt.

use arbiter_application::ports::evidence_store::EvidenceError;
use arbiter_application::ports::manifest_resolver::{ManifestResolver, UnpackedBundle};
use arbiter_domain::{Attachment, MAX_OUTCOMES, Manifest, PanelEntry, default_outcomes};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary: Option<PrimaryFile>,
    #[serde(rename = "juryParameters", default)]
    jury: Option<JuryParameters>,
    #[serde(default)]
    additional: Vec<AdditionalFile>,
    #[serde(default)]
    addendum: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrimaryFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct JuryParameters {
    #[serde(rename = "AI_NODES", default)]
    nodes: Vec<AiNode>,
    #[serde(rename = "ITERATIONS", default)]
    iterations: Option<u32>,
    #[serde(rename = "NUMBER_OF_OUTCOMES", default)]
    outcome_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct AiNode {
    #[serde(rename = "AI_PROVIDER")]
    provider: String,
    #[serde(rename = "AI_MODEL")]
    model: String,
    #[serde(rename = "NO_COUNTS", default = "one")]
    count: u32,
    #[serde(rename = "WEIGHT")]
    weight: f64,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AdditionalFile {
    Path(String),
    Entry {
        #[serde(default)]
        name: Option<String>,
        filename: String,
    },
}

impl AdditionalFile {
    fn filename(&self) -> &str {
        match self {
            Self::Path(filename) | Self::Entry { filename, .. } => filename,
        }
    }

    fn display_name(&self) -> &str {
        match self {
            Self::Entry {
                name: Some(name), ..
            } => name,
            other => other.filename(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryFile {
    query: String,
    #[serde(default)]
    outcomes: Option<Vec<String>>,
}

/// Resolves bundles laid out as `manifest.json` plus referenced files
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonManifestResolver;

impl JsonManifestResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Join a manifest-relative path onto the bundle root, refusing anything
/// that is absolute or climbs out of it.
fn bundle_file(root: &Path, relative: &str) -> Result<PathBuf, EvidenceError> {
    let path = Path::new(relative);
    let contained = !relative.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        return Err(EvidenceError::Manifest(format!(
            "file reference escapes bundle: {}",
            relative
        )));
    }
    Ok(root.join(path))
}

async fn read_referenced(root: &Path, relative: &str) -> Result<Vec<u8>, EvidenceError> {
    let path = bundle_file(root, relative)?;
    fs::read(&path)
        .await
        .map_err(|e| EvidenceError::Manifest(format!("cannot read {}: {}", relative, e)))
}

#[async_trait]
impl ManifestResolver for JsonManifestResolver {
    async fn parse(&self, bundle: &UnpackedBundle) -> Result<Manifest, EvidenceError> {
        let raw = read_referenced(&bundle.path, MANIFEST_FILE).await?;
        let file: ManifestFile = serde_json::from_slice(&raw)
            .map_err(|e| EvidenceError::Manifest(format!("{}: {}", bundle.id, e)))?;

        let primary = file.primary.as_ref().ok_or_else(|| {
            EvidenceError::Manifest(format!("{}: missing primary file", bundle.id))
        })?;
        let primary_bytes = read_referenced(&bundle.path, &primary.filename).await?;
        let (prompt, outcomes) = match serde_json::from_slice::<QueryFile>(&primary_bytes) {
            Ok(query) => (query.query, query.outcomes),
            Err(_) => (String::from_utf8_lossy(&primary_bytes).into_owned(), None),
        };

        let mut manifest = Manifest::new(prompt);
        if let Some(name) = file.name {
            manifest = manifest.with_name(name);
        }

        if let Some(jury) = file.jury {
            let models = jury
                .nodes
                .into_iter()
                .map(|n| PanelEntry::new(n.provider, n.model, n.weight).with_count(n.count))
                .collect();
            manifest = manifest.with_models(models);
            if let Some(iterations) = jury.iterations {
                manifest = manifest.with_iterations(iterations);
            }
            if let Some(count) = jury.outcome_count
                && count > MAX_OUTCOMES
            {
                return Err(EvidenceError::Manifest(format!(
                    "{}: NUMBER_OF_OUTCOMES must be at most {}, got {}",
                    bundle.id, MAX_OUTCOMES, count
                )));
            }
            let declared = outcomes.or_else(|| jury.outcome_count.map(default_outcomes));
            if let Some(declared) = declared {
                manifest = manifest.with_outcomes(declared);
            }
        } else if let Some(outcomes) = outcomes {
            manifest = manifest.with_outcomes(outcomes);
        }

        let mut attachments = Vec::with_capacity(file.additional.len());
        for entry in &file.additional {
            let bytes = read_referenced(&bundle.path, entry.filename()).await?;
            let media_type = mime_guess::from_path(entry.filename())
                .first_or_octet_stream()
                .to_string();
            attachments.push(Attachment::new(
                entry.display_name(),
                media_type,
                STANDARD.encode(bytes),
            ));
        }
        manifest = manifest.with_attachments(attachments);

        if let Some(placeholder) = file.addendum {
            manifest = manifest.with_addendum_placeholder(placeholder);
        }

        debug!(
            "Resolved manifest {}: {} model(s), {} attachment(s)",
            bundle.id,
            manifest.models.len(),
            manifest.attachments.len()
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(files: &[(&str, &str)]) -> (tempfile::TempDir, UnpackedBundle) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let unpacked = UnpackedBundle::new("bafy-test", dir.path());
        (dir, unpacked)
    }

    const PRIMARY_MANIFEST: &str = r#"{
        "name": "delivery-dispute",
        "primary": {"filename": "query.json"},
        "juryParameters": {
            "NUMBER_OF_OUTCOMES": 2,
            "AI_NODES": [
                {"AI_PROVIDER": "openai", "AI_MODEL": "gpt-4o", "NO_COUNTS": 2, "WEIGHT": 0.6},
                {"AI_PROVIDER": "anthropic", "AI_MODEL": "claude-sonnet-4", "WEIGHT": 0.4}
            ],
            "ITERATIONS": 2
        },
        "additional": [{"name": "photo", "filename": "photo.png"}, "receipt.txt"],
        "addendum": "{{ADDENDUM}}"
    }"#;

    #[tokio::test]
    async fn test_primary_manifest_is_fully_resolved() {
        let (_dir, unpacked) = bundle(&[
            ("manifest.json", PRIMARY_MANIFEST),
            (
                "query.json",
                r#"{"query": "Was the parcel delivered? {{ADDENDUM}}", "outcomes": ["Delivered", "Lost"]}"#,
            ),
            ("photo.png", "png"),
            ("receipt.txt", "paid"),
        ]);

        let manifest = JsonManifestResolver::new().parse(&unpacked).await.unwrap();

        assert_eq!(manifest.name.as_deref(), Some("delivery-dispute"));
        assert_eq!(manifest.prompt, "Was the parcel delivered? {{ADDENDUM}}");
        assert_eq!(manifest.iterations, 2);
        assert_eq!(
            manifest.outcomes,
            Some(vec!["Delivered".to_string(), "Lost".to_string()])
        );
        assert_eq!(manifest.models.len(), 2);
        assert_eq!(manifest.models[0].count, 2);
        assert_eq!(manifest.models[1].count, 1);
        assert_eq!(manifest.addendum_placeholder.as_deref(), Some("{{ADDENDUM}}"));

        assert_eq!(manifest.attachments[0].name, "photo");
        assert_eq!(manifest.attachments[0].media_type, "image/png");
        assert_eq!(manifest.attachments[1].name, "receipt.txt");
        assert_eq!(manifest.attachments[1].data, STANDARD.encode("paid"));
    }

    #[tokio::test]
    async fn test_outcome_count_without_labels_uses_defaults() {
        let (_dir, unpacked) = bundle(&[
            (
                "manifest.json",
                r#"{"primary": {"filename": "q.txt"}, "juryParameters": {"NUMBER_OF_OUTCOMES": 3, "AI_NODES": []}}"#,
            ),
            ("q.txt", "Pick one."),
        ]);

        let manifest = JsonManifestResolver::new().parse(&unpacked).await.unwrap();
        assert_eq!(manifest.prompt, "Pick one.");
        assert_eq!(manifest.outcomes, Some(default_outcomes(3)));
        assert_eq!(manifest.iterations, 1);
    }

    #[tokio::test]
    async fn test_oversized_outcome_count_is_manifest_error() {
        let (_dir, unpacked) = bundle(&[
            (
                "manifest.json",
                r#"{"primary": {"filename": "q.txt"}, "juryParameters": {"NUMBER_OF_OUTCOMES": 1000000000000, "AI_NODES": []}}"#,
            ),
            ("q.txt", "Pick one."),
        ]);

        let error = JsonManifestResolver::new().parse(&unpacked).await.unwrap_err();
        assert!(matches!(error, EvidenceError::Manifest(_)));
        assert!(error.to_string().contains("NUMBER_OF_OUTCOMES"));
    }

    #[tokio::test]
    async fn test_secondary_bundle_needs_only_text() {
        let (_dir, unpacked) = bundle(&[
            ("manifest.json", r#"{"primary": {"filename": "statement.txt"}}"#),
            ("statement.txt", "The courier left it at the door."),
        ]);

        let manifest = JsonManifestResolver::new().parse(&unpacked).await.unwrap();
        assert!(manifest.models.is_empty());
        assert!(manifest.outcomes.is_none());
        assert!(manifest.name.is_none());
    }

    #[tokio::test]
    async fn test_secondaries_are_named_by_id() {
        let (_p, primary) = bundle(&[
            ("manifest.json", PRIMARY_MANIFEST),
            ("query.json", r#"{"query": "Q"}"#),
            ("photo.png", "x"),
            ("receipt.txt", "y"),
        ]);
        let (_s, mut secondary) = bundle(&[
            ("manifest.json", r#"{"primary": {"filename": "s.txt"}}"#),
            ("s.txt", "witness"),
        ]);
        secondary.id = "bafy-witness".into();

        let (primary, secondaries) = JsonManifestResolver::new()
            .parse_multiple(&[primary, secondary])
            .await
            .unwrap();
        assert_eq!(primary.prompt, "Q");
        assert_eq!(secondaries[0].name.as_deref(), Some("bafy-witness"));
    }

    #[tokio::test]
    async fn test_escaping_references_are_rejected() {
        let (_dir, unpacked) = bundle(&[(
            "manifest.json",
            r#"{"primary": {"filename": "../outside.txt"}}"#,
        )]);

        let error = JsonManifestResolver::new().parse(&unpacked).await.unwrap_err();
        assert!(matches!(error, EvidenceError::Manifest(_)));
    }

    #[tokio::test]
    async fn test_missing_primary_is_manifest_error() {
        let (_dir, unpacked) = bundle(&[("manifest.json", "{}")]);
        let error = JsonManifestResolver::new().parse(&unpacked).await.unwrap_err();
        assert!(error.to_string().contains("missing primary"));
    }
}
