//! Module Commercial : devis
//!
//! La création passe la porte licence : sans licence valide, l'entreprise
//! garde la lecture mais ne produit plus de nouveaux documents.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use gesco_core::domain::{Devis, DevisCreate, PermAction};
use gesco_core::services::{require_tenant, validated_entreprise_id, DevisService};
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::{PgDevisRepository, PgTiersRepository};

use crate::error::{validate_payload, ApiError};
use crate::extract::{CurrentUser, DbTx};
use crate::handlers::{access_control, ListQuery};
use crate::state::AppState;

const MODULE: &str = "commercial";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commercial/devis", get(list_devis).post(create_devis))
        .route("/commercial/devis/{id}", get(get_devis))
}

fn devis_service(tx: &Tx) -> DevisService<PgDevisRepository, PgTiersRepository> {
    DevisService::new(
        PgDevisRepository::new(tx.clone()),
        PgTiersRepository::new(tx.clone()),
    )
}

async fn list_devis(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Devis>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let filter = query.page_filter();
    let items = devis_service(&tx)
        .list(entreprise_id, filter.skip, filter.limit)
        .await?;
    Ok(Json(items))
}

async fn get_devis(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Devis>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let devis = devis_service(&tx).get_or_404(id).await?;
    require_tenant(&principal, devis.entreprise_id)?;
    Ok(Json(devis))
}

async fn create_devis(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Json(payload): Json<DevisCreate>,
) -> Result<(StatusCode, Json<Devis>), ApiError> {
    validate_payload(&payload)?;
    let access = access_control(&state, &tx);
    access
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    access
        .require_licence(&principal, MODULE, PermAction::Write)
        .await?;
    let devis = devis_service(&tx)
        .create(principal.entreprise_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(devis)))
}
