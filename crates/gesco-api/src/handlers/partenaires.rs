//! Module Partenaires : tiers et contacts
//!
//! Un contact n'a pas d'entreprise en propre : elle se résout via son tiers
//! avant toute lecture ou écriture (règle des ressources imbriquées).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use gesco_core::domain::{Contact, ContactCreate, PermAction, Tiers, TiersCreate, TiersUpdate};
use gesco_core::services::{require_tenant, validated_entreprise_id, TiersService};
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::{PgContactRepository, PgTiersRepository};

use crate::error::{validate_payload, ApiError};
use crate::extract::{CurrentUser, DbTx};
use crate::handlers::{access_control, ListQuery};
use crate::state::AppState;

const MODULE: &str = "partenaires";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/partenaires/tiers", get(list_tiers).post(create_tiers))
        .route(
            "/partenaires/tiers/{id}",
            get(get_tiers).patch(update_tiers).delete(delete_tiers),
        )
        .route(
            "/partenaires/tiers/{id}/contacts",
            get(list_contacts).post(create_contact),
        )
        .route("/partenaires/contacts/{id}", delete(delete_contact))
}

fn tiers_service(tx: &Tx) -> TiersService<PgTiersRepository, PgContactRepository> {
    TiersService::new(
        PgTiersRepository::new(tx.clone()),
        PgContactRepository::new(tx.clone()),
    )
}

async fn list_tiers(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Tiers>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let items = tiers_service(&tx)
        .list(entreprise_id, &query.page_filter())
        .await?;
    Ok(Json(items))
}

async fn get_tiers(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Tiers>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let tiers = tiers_service(&tx).get_or_404(id).await?;
    require_tenant(&principal, tiers.entreprise_id)?;
    Ok(Json(tiers))
}

async fn create_tiers(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
    Json(payload): Json<TiersCreate>,
) -> Result<(StatusCode, Json<Tiers>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let tiers = tiers_service(&tx).create(entreprise_id, payload).await?;
    Ok((StatusCode::CREATED, Json(tiers)))
}

async fn update_tiers(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<TiersUpdate>,
) -> Result<Json<Tiers>, ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = tiers_service(&tx);
    let tiers = service.get_or_404(id).await?;
    require_tenant(&principal, tiers.entreprise_id)?;
    let tiers = service.update(id, payload).await?;
    Ok(Json(tiers))
}

async fn delete_tiers(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = tiers_service(&tx);
    let tiers = service.get_or_404(id).await?;
    require_tenant(&principal, tiers.entreprise_id)?;
    service.delete_soft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Contacts ---

async fn list_contacts(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let service = tiers_service(&tx);
    let tiers = service.get_or_404(id).await?;
    require_tenant(&principal, tiers.entreprise_id)?;
    let contacts = service.list_contacts(id).await?;
    Ok(Json(contacts))
}

async fn create_contact(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<ContactCreate>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = tiers_service(&tx);
    let tiers = service.get_or_404(id).await?;
    require_tenant(&principal, tiers.entreprise_id)?;
    let contact = service.create_contact(id, payload).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn delete_contact(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = tiers_service(&tx);
    let entreprise_id = service.owning_entreprise_of_contact(id).await?;
    require_tenant(&principal, entreprise_id)?;
    service.delete_contact(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
