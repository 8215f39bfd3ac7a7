use async_trait::async_trait;

use crate::domain::{Entreprise, EntrepriseCreate};
use crate::error::DomainError;
use crate::repositories::PageFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntrepriseRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Entreprise>, DomainError>;

    async fn find_all(&self, filter: &PageFilter) -> Result<Vec<Entreprise>, DomainError>;

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError>;

    async fn insert(&self, data: &EntrepriseCreate) -> Result<Entreprise, DomainError>;

    async fn update(&self, entreprise: &Entreprise) -> Result<Entreprise, DomainError>;

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError>;
}
