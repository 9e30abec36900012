use super::handlers::{evaluate, health, list_models, rank_and_justify};
use super::state::AppState;
use arbiter_application::ProviderGateway;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Full HTTP surface with request tracing
pub fn router<G: ProviderGateway + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/models", get(list_models::<G>))
        .route("/rank-and-justify", post(rank_and_justify::<G>))
        .route("/evaluate", post(evaluate::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
