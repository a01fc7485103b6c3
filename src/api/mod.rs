pub mod balances;
pub mod health;
pub mod impermanence;
pub mod swaps;

use crate::orchestration::Reconciler;
use axum::{routing::get, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self { reconciler }
    }
}

/// `?token=` restriction shared by the valuation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Trim a query value; blank means absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/swaps", get(swaps::get_swaps))
        .route("/v1/swaps/consolidated", get(swaps::get_consolidated))
        .route("/v1/impermanence", get(impermanence::get_impermanence))
        .route("/v1/balances", get(balances::get_balances))
        .layer(cors)
        .with_state(state)
}
