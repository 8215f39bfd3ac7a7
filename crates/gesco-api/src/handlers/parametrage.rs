//! Module Paramétrage : entreprises, rôles, permissions, utilisateurs
//!
//! Les listes sont scoped par l'entreprise validée ; les accès par id
//! vérifient l'entreprise propriétaire avant de lire ou d'écrire.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use gesco_core::domain::{
    Entreprise, EntrepriseCreate, EntrepriseUpdate, PermAction, Permission, Role, RoleCreate,
    RoleUpdate, Utilisateur, UtilisateurCreate, UtilisateurUpdate,
};
use gesco_core::services::{
    require_tenant, validated_entreprise_id, EntrepriseService, RoleService, UtilisateurService,
};
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::{
    PgEntrepriseRepository, PgPermissionRepository, PgRoleRepository, PgUtilisateurRepository,
};

use crate::error::{validate_payload, ApiError};
use crate::extract::{CurrentUser, DbTx};
use crate::handlers::{access_control, ListQuery};
use crate::state::AppState;

const MODULE: &str = "parametrage";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parametrage/entreprises", get(list_entreprises).post(create_entreprise))
        .route(
            "/parametrage/entreprises/{id}",
            get(get_entreprise).patch(update_entreprise).delete(delete_entreprise),
        )
        .route("/parametrage/roles", get(list_roles).post(create_role))
        .route("/parametrage/roles/{id}", get(get_role).patch(update_role))
        .route(
            "/parametrage/roles/{role_id}/permissions/{permission_id}",
            post(grant_permission).delete(revoke_permission),
        )
        .route("/parametrage/permissions", get(list_permissions))
        .route(
            "/parametrage/utilisateurs",
            get(list_utilisateurs).post(create_utilisateur),
        )
        .route(
            "/parametrage/utilisateurs/{id}",
            get(get_utilisateur).patch(update_utilisateur).delete(delete_utilisateur),
        )
}

fn entreprise_service(tx: &Tx) -> EntrepriseService<PgEntrepriseRepository> {
    EntrepriseService::new(PgEntrepriseRepository::new(tx.clone()))
}

fn role_service(
    tx: &Tx,
) -> RoleService<PgRoleRepository, PgEntrepriseRepository, PgPermissionRepository> {
    RoleService::new(
        PgRoleRepository::new(tx.clone()),
        PgEntrepriseRepository::new(tx.clone()),
        PgPermissionRepository::new(tx.clone()),
    )
}

fn utilisateur_service(
    state: &AppState,
    tx: &Tx,
) -> UtilisateurService<PgUtilisateurRepository, PgEntrepriseRepository, PgRoleRepository> {
    UtilisateurService::new(
        PgUtilisateurRepository::new(tx.clone()),
        PgEntrepriseRepository::new(tx.clone()),
        PgRoleRepository::new(tx.clone()),
        state.passwords,
    )
}

// --- Entreprises ---

async fn list_entreprises(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Entreprise>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let items = entreprise_service(&tx).list(&query.page_filter()).await?;
    Ok(Json(items))
}

async fn get_entreprise(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Entreprise>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    require_tenant(&principal, id)?;
    let entreprise = entreprise_service(&tx).get_or_404(id).await?;
    Ok(Json(entreprise))
}

async fn create_entreprise(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Json(payload): Json<EntrepriseCreate>,
) -> Result<(StatusCode, Json<Entreprise>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let entreprise = entreprise_service(&tx).create(payload).await?;
    Ok((StatusCode::CREATED, Json(entreprise)))
}

async fn update_entreprise(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<EntrepriseUpdate>,
) -> Result<Json<Entreprise>, ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    require_tenant(&principal, id)?;
    let entreprise = entreprise_service(&tx).update(id, payload).await?;
    Ok(Json(entreprise))
}

async fn delete_entreprise(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    require_tenant(&principal, id)?;
    entreprise_service(&tx).delete_soft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Rôles ---

async fn list_roles(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Role>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let filter = query.page_filter();
    let items = role_service(&tx)
        .list(Some(entreprise_id), filter.skip, filter.limit)
        .await?;
    Ok(Json(items))
}

async fn get_role(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Role>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let role = role_service(&tx).get_or_404(id).await?;
    if let Some(entreprise_id) = role.entreprise_id {
        require_tenant(&principal, entreprise_id)?;
    }
    Ok(Json(role))
}

async fn create_role(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Json(payload): Json<RoleCreate>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    if let Some(entreprise_id) = payload.entreprise_id {
        require_tenant(&principal, entreprise_id)?;
    }
    let role = role_service(&tx).create(payload).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

async fn update_role(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> Result<Json<Role>, ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = role_service(&tx);
    let role = service.get_or_404(id).await?;
    if let Some(entreprise_id) = role.entreprise_id {
        require_tenant(&principal, entreprise_id)?;
    }
    let role = service.update(id, payload).await?;
    Ok(Json(role))
}

async fn grant_permission(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = role_service(&tx);
    let role = service.get_or_404(role_id).await?;
    if let Some(entreprise_id) = role.entreprise_id {
        require_tenant(&principal, entreprise_id)?;
    }
    service.grant_permission(role_id, permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn revoke_permission(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = role_service(&tx);
    let role = service.get_or_404(role_id).await?;
    if let Some(entreprise_id) = role.entreprise_id {
        require_tenant(&principal, entreprise_id)?;
    }
    service.revoke_permission(role_id, permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_permissions(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
) -> Result<Json<Vec<Permission>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let items = role_service(&tx).list_permissions().await?;
    Ok(Json(items))
}

// --- Utilisateurs ---

async fn list_utilisateurs(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Utilisateur>>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let entreprise_id = validated_entreprise_id(&principal, query.entreprise_id)?;
    let items = utilisateur_service(&state, &tx)
        .list(entreprise_id, &query.page_filter())
        .await?;
    Ok(Json(items))
}

async fn get_utilisateur(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<Json<Utilisateur>, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Read)
        .await?;
    let user = utilisateur_service(&state, &tx).get_or_404(id).await?;
    require_tenant(&principal, user.entreprise_id)?;
    Ok(Json(user))
}

async fn create_utilisateur(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Json(payload): Json<UtilisateurCreate>,
) -> Result<(StatusCode, Json<Utilisateur>), ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    require_tenant(&principal, payload.entreprise_id)?;
    let user = utilisateur_service(&state, &tx).create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_utilisateur(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
    Json(payload): Json<UtilisateurUpdate>,
) -> Result<Json<Utilisateur>, ApiError> {
    validate_payload(&payload)?;
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = utilisateur_service(&state, &tx);
    let user = service.get_or_404(id).await?;
    require_tenant(&principal, user.entreprise_id)?;
    let user = service.update(id, payload).await?;
    Ok(Json(user))
}

async fn delete_utilisateur(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    DbTx(tx): DbTx,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    access_control(&state, &tx)
        .require_permission(&principal, MODULE, PermAction::Write)
        .await?;
    let service = utilisateur_service(&state, &tx);
    let user = service.get_or_404(id).await?;
    require_tenant(&principal, user.entreprise_id)?;
    service.delete_soft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
