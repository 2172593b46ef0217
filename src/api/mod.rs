pub mod chains;
pub mod health;
pub mod protocols;

use crate::config::Config;
use crate::domain::ExtraTvlToggleSet;
use crate::orchestration::Orchestrator;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// Toggle set for a request: the `extraTvls` list when given, else the configured default.
    pub fn toggles_for(&self, extra_tvls: Option<&str>) -> ExtraTvlToggleSet {
        match extra_tvls {
            Some(list) => ExtraTvlToggleSet::parse_enabled_list(list),
            None => self.config.default_toggles.clone(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/chains", get(chains::get_chains))
        .route("/v1/chains/csv", get(chains::get_chains_csv))
        .route("/v1/protocols", get(protocols::get_protocols))
        .route("/v1/protocols/recent", get(protocols::get_recent_protocols))
        .route("/v1/protocols/:name", get(protocols::get_protocol))
        .layer(cors)
        .with_state(state)
}
