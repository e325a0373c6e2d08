use std::sync::Arc;

use axum::{Router, routing::get};
use config::Config;
use gateway::AdAccountGateway;

pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod routes;
pub mod utils;
pub mod validation;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn AdAccountGateway>,
}

/// Assembles the HTTP surface, nested under `config.api_base_uri` when set.
pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .route(
            "/ad_account",
            get(routes::ad_account::get_spend_limit).post(routes::ad_account::set_spend_limit),
        )
        .route("/ping", get(routes::system::ping));

    let base_uri = state.config.api_base_uri.trim_matches('/');
    let router = if base_uri.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{base_uri}"), routes)
    };

    let router = router.layer(axum::middleware::from_fn(middleware::log_errors));

    // Permissive CORS in debug builds only.
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
