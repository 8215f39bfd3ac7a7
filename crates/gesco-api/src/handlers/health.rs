//! Endpoints publics : racine et santé

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / — infos service, sans authentification.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "app": state.settings.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
        "api_v1": state.settings.api_v1_prefix,
    }))
}

/// GET /health — sans authentification ni accès base, pour les load
/// balancers.
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok", "service": "gesco"}))
}
