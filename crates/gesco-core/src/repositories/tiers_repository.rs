use async_trait::async_trait;

use crate::domain::{Tiers, TiersCreate};
use crate::error::DomainError;
use crate::repositories::PageFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TiersRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tiers>, DomainError>;

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Tiers>, DomainError>;

    async fn exists_by_entreprise_and_code(
        &self,
        entreprise_id: i64,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError>;

    async fn insert(&self, entreprise_id: i64, data: &TiersCreate) -> Result<Tiers, DomainError>;

    async fn update(&self, tiers: &Tiers) -> Result<Tiers, DomainError>;

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError>;
}
