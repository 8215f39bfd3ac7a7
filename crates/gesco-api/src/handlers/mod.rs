//! HTTP handlers
//!
//! Composition par endpoint protégé, dans l'ordre : permission →
//! entreprise → licence (écritures sur modules à documents). Tout refus
//! sort en 403 et fait rollbacker la transaction par le middleware.

pub mod auth;
pub mod commercial;
pub mod health;
pub mod parametrage;
pub mod partenaires;
pub mod systeme;

use serde::Deserialize;

use gesco_core::repositories::PageFilter;
use gesco_core::services::AccessControl;
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::{PgLicenceRepository, PgPermissionRepository};

use crate::state::AppState;

/// Portes d'accès branchées sur la transaction de la requête.
pub(crate) fn access_control(
    state: &AppState,
    tx: &Tx,
) -> AccessControl<PgPermissionRepository, PgLicenceRepository> {
    AccessControl::new(
        PgPermissionRepository::new(tx.clone()),
        PgLicenceRepository::new(tx.clone()),
        state.settings.permissions_default_open,
    )
}

/// Paramètres de liste communs : pagination, filtre actif, recherche et
/// filtre d'entreprise (validé contre le principal par les handlers).
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub entreprise_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub actif_only: bool,
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    20
}

impl ListQuery {
    pub fn page_filter(&self) -> PageFilter {
        PageFilter {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, 100),
            actif_only: self.actif_only,
            search: self.search.clone(),
        }
    }
}
