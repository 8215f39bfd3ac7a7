use async_trait::async_trait;

use crate::domain::{PermAction, Permission};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Permission>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>, DomainError>;

    /// Couples `(module, action)` accordés au rôle. Vide = rôle sans
    /// permissions configurées.
    async fn find_permissions_by_role_id(
        &self,
        role_id: i64,
    ) -> Result<Vec<(String, PermAction)>, DomainError>;

    async fn grant_to_role(&self, role_id: i64, permission_id: i64) -> Result<(), DomainError>;

    /// Retourne `false` quand la liaison n'existait pas.
    async fn revoke_from_role(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<bool, DomainError>;
}
