use async_trait::async_trait;

use crate::domain::{Contact, ContactCreate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, DomainError>;

    async fn find_by_tiers(&self, tiers_id: i64) -> Result<Vec<Contact>, DomainError>;

    async fn insert(&self, tiers_id: i64, data: &ContactCreate) -> Result<Contact, DomainError>;

    /// Retourne `false` quand le contact n'existait pas.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
