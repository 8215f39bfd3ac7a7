//! Assemblage du routeur
//!
//! Les routes `/api/v1` passent toutes par la portée transactionnelle ; la
//! limitation de débit enveloppe l'ensemble, santé comprise. CORS est posé
//! par le binaire (configuration d'origines).

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::handlers::{auth, commercial, health, parametrage, partenaires, systeme};
use crate::middleware::{rate_limit, tx};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(parametrage::router())
        .merge(partenaires::router())
        .merge(commercial::router())
        .merge(systeme::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tx::transaction_layer,
        ));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .nest(&state.settings.api_v1_prefix, api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_layer,
        ))
        .with_state(state)
}
