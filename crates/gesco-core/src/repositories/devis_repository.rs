use async_trait::async_trait;

use crate::domain::{Devis, NewDevis};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DevisRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Devis>, DomainError>;

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Devis>, DomainError>;

    async fn insert(&self, devis: &NewDevis) -> Result<Devis, DomainError>;
}
