//! Repository traits
//!
//! Narrow persistence seams implemented by `gesco-infrastructure` on the
//! request transaction. Every implementation must filter out tombstoned
//! rows (`deleted_at IS NULL`) so soft-deleted entities never leak upward.

mod contact_repository;
mod devis_repository;
mod entreprise_repository;
mod licence_repository;
mod permission_repository;
mod role_repository;
mod tiers_repository;
mod utilisateur_repository;

pub use contact_repository::ContactRepository;
pub use devis_repository::DevisRepository;
pub use entreprise_repository::EntrepriseRepository;
pub use licence_repository::{LicenceFilter, LicenceRepository};
pub use permission_repository::PermissionRepository;
pub use role_repository::RoleRepository;
pub use tiers_repository::TiersRepository;
pub use utilisateur_repository::UtilisateurRepository;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use devis_repository::MockDevisRepository;
#[cfg(test)]
pub use entreprise_repository::MockEntrepriseRepository;
#[cfg(test)]
pub use licence_repository::MockLicenceRepository;
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
#[cfg(test)]
pub use tiers_repository::MockTiersRepository;
#[cfg(test)]
pub use utilisateur_repository::MockUtilisateurRepository;

/// Pagination et filtres communs aux listes.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pub skip: i64,
    pub limit: i64,
    pub actif_only: bool,
    pub search: Option<String>,
}

impl PageFilter {
    pub fn page(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            ..Default::default()
        }
    }
}
