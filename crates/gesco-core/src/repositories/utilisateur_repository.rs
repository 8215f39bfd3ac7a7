use async_trait::async_trait;

use crate::domain::{NewUtilisateur, Utilisateur};
use crate::error::DomainError;
use crate::repositories::PageFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UtilisateurRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Utilisateur>, DomainError>;

    /// Recherche par login **ou** email dans une entreprise, lignes vivantes
    /// uniquement.
    async fn find_by_entreprise_and_login(
        &self,
        entreprise_id: i64,
        login_or_email: &str,
    ) -> Result<Option<Utilisateur>, DomainError>;

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Utilisateur>, DomainError>;

    async fn insert(&self, user: &NewUtilisateur) -> Result<Utilisateur, DomainError>;

    async fn update(&self, user: &Utilisateur) -> Result<Utilisateur, DomainError>;

    /// Met à jour `last_login_at` à maintenant.
    async fn record_login(&self, id: i64) -> Result<(), DomainError>;

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError>;
}
