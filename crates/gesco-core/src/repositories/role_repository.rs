use async_trait::async_trait;

use crate::domain::{Role, RoleCreate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DomainError>;

    /// `entreprise_id = None` liste tout (rôles système compris).
    async fn find_all(
        &self,
        entreprise_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Role>, DomainError>;

    async fn exists_by_entreprise_and_code(
        &self,
        entreprise_id: Option<i64>,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError>;

    async fn insert(&self, data: &RoleCreate) -> Result<Role, DomainError>;

    async fn update(&self, role: &Role) -> Result<Role, DomainError>;
}
