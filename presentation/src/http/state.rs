use arbiter_application::{
    EvaluateUseCase, ListModelsUseCase, ProviderGateway, RunArbitrationUseCase,
};
use std::sync::Arc;

/// Use cases shared by every request handler
pub struct AppState<G: ProviderGateway + 'static> {
    pub arbitration: Arc<RunArbitrationUseCase<G>>,
    pub models: Arc<ListModelsUseCase<G>>,
    pub evaluate: Arc<EvaluateUseCase<G>>,
}

impl<G: ProviderGateway + 'static> AppState<G> {
    pub fn new(
        arbitration: Arc<RunArbitrationUseCase<G>>,
        models: Arc<ListModelsUseCase<G>>,
        evaluate: Arc<EvaluateUseCase<G>>,
    ) -> Self {
        Self {
            arbitration,
            models,
            evaluate,
        }
    }
}

// Derived Clone would require `G: Clone`
impl<G: ProviderGateway + 'static> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            arbitration: Arc::clone(&self.arbitration),
            models: Arc::clone(&self.models),
            evaluate: Arc::clone(&self.evaluate),
        }
    }
}
