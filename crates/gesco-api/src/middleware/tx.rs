//! Portée transactionnelle par requête
//!
//! Une transaction est ouverte à l'entrée, exposée aux handlers via les
//! extensions, puis commitée si la réponse est un succès et rollbackée dès
//! qu'un statut d'erreur sort (les refus d'autorisation compris). Exactement
//! un commit ou un rollback par requête ; un commit qui échoue devient un
//! 500 au format standard.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use gesco_infrastructure::database::Tx;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn transaction_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let tx = match Tx::begin(&state.pool).await {
        Ok(tx) => tx,
        Err(e) => {
            error!("failed to begin transaction: {e}");
            return ApiError::internal().into_response();
        }
    };
    request.extensions_mut().insert(tx.clone());

    let response = next.run(request).await;

    if response.status().is_client_error() || response.status().is_server_error() {
        if let Err(e) = tx.rollback().await {
            error!("rollback failed: {e}");
        }
        return response;
    }
    match tx.commit().await {
        Ok(()) => response,
        Err(e) => {
            error!("commit failed: {e}");
            ApiError::internal().into_response()
        }
    }
}
