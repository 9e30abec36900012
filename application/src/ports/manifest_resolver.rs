//! Manifest resolver port
//!
//! Turns an unpacked evidence bundle into a [`Manifest`].

use super::evidence_store::EvidenceError;
use arbiter_domain::Manifest;
use async_trait::async_trait;
use std::path::PathBuf;

/// An unpacked bundle and the identifier it was fetched under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedBundle {
    pub id: String,
    pub path: PathBuf,
}

impl UnpackedBundle {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

#[async_trait]
pub trait ManifestResolver: Send + Sync {
    /// Read the manifest of one bundle
    async fn parse(&self, bundle: &UnpackedBundle) -> Result<Manifest, EvidenceError>;

    /// Read a primary bundle and its secondaries, in order.
    ///
    /// Secondary manifests without a name are labelled with their identifier.
    async fn parse_multiple(
        &self,
        bundles: &[UnpackedBundle],
    ) -> Result<(Manifest, Vec<Manifest>), EvidenceError> {
        let (first, rest) = bundles
            .split_first()
            .ok_or_else(|| EvidenceError::Invalid("no evidence bundles".to_string()))?;

        let primary = self.parse(first).await?;
        let mut secondaries = Vec::with_capacity(rest.len());
        for bundle in rest {
            let manifest = self.parse(bundle).await?;
            secondaries.push(match manifest.name {
                Some(_) => manifest,
                None => manifest.with_name(bundle.id.clone()),
            });
        }
        Ok((primary, secondaries))
    }
}
