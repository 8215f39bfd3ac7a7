//! Implémentations Postgres des repositories
//!
//! Chaque repository emprunte la connexion de la transaction courante via
//! son handle [`Tx`](crate::database::Tx) : toutes les écritures d'une
//! requête partagent la même transaction et ne deviennent visibles qu'au
//! commit de la couche HTTP. Les filtres de soft delete
//! (`deleted_at IS NULL`) vivent ici et nulle part ailleurs.

mod contact_repo;
mod devis_repo;
mod entreprise_repo;
mod licence_repo;
mod permission_repo;
mod role_repo;
mod tiers_repo;
mod utilisateur_repo;

pub use contact_repo::PgContactRepository;
pub use devis_repo::PgDevisRepository;
pub use entreprise_repo::PgEntrepriseRepository;
pub use licence_repo::PgLicenceRepository;
pub use permission_repo::PgPermissionRepository;
pub use role_repo::PgRoleRepository;
pub use tiers_repo::PgTiersRepository;
pub use utilisateur_repo::PgUtilisateurRepository;

use gesco_core::error::DomainError;

/// Erreur sqlx → erreur domaine ; les violations d'unicité deviennent des
/// conflits avec le libellé de l'entité.
pub(crate) fn map_db_err(e: sqlx::Error, conflict_detail: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return DomainError::conflict(conflict_detail);
        }
    }
    tracing::error!("database error: {e}");
    DomainError::Database(e.to_string())
}

pub(crate) fn db_err(e: sqlx::Error) -> DomainError {
    tracing::error!("database error: {e}");
    DomainError::Database(e.to_string())
}
