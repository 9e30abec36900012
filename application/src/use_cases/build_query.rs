//! Build Query use case
//!
//! Resolves the evidence bundles of one request into a [`QueryObject`]:
//! fetch → unpack → validate → resolve manifests → combine. The working
//! directory is removed on every exit path.

use crate::ports::evidence_store::{EvidenceError, EvidenceStore};
use crate::ports::manifest_resolver::{ManifestResolver, UnpackedBundle};
use arbiter_domain::evidence::combine_query;
use arbiter_domain::{ArbitrationError, EvidenceRequest, QueryObject};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct BuildQueryUseCase {
    store: Arc<dyn EvidenceStore>,
    resolver: Arc<dyn ManifestResolver>,
}

impl BuildQueryUseCase {
    pub fn new(store: Arc<dyn EvidenceStore>, resolver: Arc<dyn ManifestResolver>) -> Self {
        Self { store, resolver }
    }

    pub async fn execute(&self, request: &EvidenceRequest) -> Result<QueryObject, ArbitrationError> {
        let work_dir = self.store.create_work_dir().await?;
        let result = self.build_in(&work_dir, request).await;
        self.store.cleanup(&work_dir).await;
        result
    }

    async fn build_in(
        &self,
        work_dir: &Path,
        request: &EvidenceRequest,
    ) -> Result<QueryObject, ArbitrationError> {
        info!(
            "Resolving evidence {} with {} secondary bundle(s)",
            request.primary(),
            request.secondaries().len()
        );

        let mut bundles = Vec::with_capacity(request.ids().len());
        for (index, id) in request.ids().iter().enumerate() {
            let bytes = self.store.fetch(id).await?;
            let dest = work_dir.join(format!("bundle-{}", index));
            let root = self.store.unpack(&bytes, &dest).await?;
            if !self.store.validate(&root).await {
                return Err(EvidenceError::Invalid(id.clone()).into());
            }
            debug!("Evidence {} unpacked to {}", id, root.display());
            bundles.push(UnpackedBundle::new(id.clone(), root));
        }

        let (primary, secondaries) = self.resolver.parse_multiple(&bundles).await?;
        let query = combine_query(&primary, &secondaries, request.addendum());
        query.validate()?;
        Ok(query)
    }
}
