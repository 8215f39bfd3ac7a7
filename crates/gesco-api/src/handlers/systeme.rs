//! Module Système : licences logicielles

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use gesco_core::domain::{Licence, LicenceCreate, LicenceUpdate, LicenceValidite, PermAction};
use gesco_core::repositories::LicenceFilter;
use gesco_core::services::{require_tenant, validated_entreprise_id, LicenceService};
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::{PgEntrepriseRepository, PgLicenceRepository};

use crate::error::{validate_payload, ApiError};
use crate::extract::{CurrentUser, DbTx};
use crate::handlers::access_control;
use crate::state::AppState;

const MODULE: &str = "systeme";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/systeme/licences", get(list_licences).post(create_licence))
        .route("/systeme/licences/validite", get(validite_licence))
        .route("/systeme/licences/{id}", get(get_licence).patch(update_licence))
        .route("/systeme/licences/{id}/activer", post(activer_licence))
        .route("/systeme/licences/{id}/prolonger", post(prolonger_licence))
}

fn licence_service(tx: &Tx) -> LicenceService<PgLicenceRepository, PgEntrepriseRepository> {
    LicenceService::new(
        PgLicenceRepository::new(tx.clone()),
        PgEntrepriseRepository::new(tx.clone()),
    )
}

#[derive(Debug, Deserialize)]
struct LicenceQuery {
    entreprise_id: Option<i64>,
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    actif_only: bool,
    #[serde(default)]
    valide_only: bool,
}

fn default_limit() -> i64 {
    20
}

async fn list_licences(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<LicenceQuery>,
) -> Result<Json<Vec<Licence>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let filter = LicenceFilter {
        entreprise_id: Some(entreprise_id),
        actif_only: query.actif_only,
        valide_on: query
            .valide_only
            .then(|| chrono::Utc::now().date_naive()),
        skip: query.skip.max(0),
        limit: query.limit.clamp(1, 100),
    };
    let items = licence_service(&tx).list(&filter).await?;
    Ok(Json(items))
}

/// GET /systeme/licences/validite — validité de la licence de l'entreprise
/// du principal.
async fn validite_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
) -> Result<Json<LicenceValidite>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let validite = licence_service(&tx)
        .verifier_validite(principal.entreprise_id)
        .await?;
    Ok(Json(validite))
}

async fn get_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Licence>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let licence = licence_service(&tx).get_or_404(id).await?;
    require_tenant(&principal, licence.entreprise_id)?;
    Ok(Json(licence))
}

async fn create_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Json(payload): Json<LicenceCreate>,
) -> Result<(StatusCode, Json<Licence>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    require_tenant(&principal, payload.entreprise_id)?;
    let licence = licence_service(&tx).create(payload).await?;
    Ok((StatusCode::CREATED, Json(licence)))
}

async fn update_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<LicenceUpdate>,
) -> Result<Json<Licence>, ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = licence_service(&tx);
    let licence = service.get_or_404(id).await?;
    require_tenant(&principal, licence.entreprise_id)?;
    let licence = service.update(id, payload).await?;
    Ok(Json(licence))
}

async fn activer_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Licence>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = licence_service(&tx);
    let licence = service.get_or_404(id).await?;
    require_tenant(&principal, licence.entreprise_id)?;
    let licence = service.activer(id).await?;
    Ok(Json(licence))
}

async fn prolonger_licence(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Licence>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = licence_service(&tx);
    let licence = service.get_or_404(id).await?;
    require_tenant(&principal, licence.entreprise_id)?;
    let licence = service.prolonger(id).await?;
    Ok(Json(licence))
}
