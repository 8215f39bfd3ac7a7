//! Use case Rôles et liaison rôle ↔ permission

use crate::domain::{Permission, Role, RoleCreate, RoleUpdate};
use crate::error::DomainError;
use crate::messages;
use crate::repositories::{EntrepriseRepository, PermissionRepository, RoleRepository};

pub struct RoleService<R, E, P>
where
    R: RoleRepository,
    E: EntrepriseRepository,
    P: PermissionRepository,
{
    roles: R,
    entreprises: E,
    permissions: P,
}

impl<R, E, P> RoleService<R, E, P>
where
    R: RoleRepository,
    E: EntrepriseRepository,
    P: PermissionRepository,
{
    pub fn new(roles: R, entreprises: E, permissions: P) -> Self {
        Self {
            roles,
            entreprises,
            permissions,
        }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Role, DomainError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::ROLE_NOT_FOUND))
    }

    pub async fn list(
        &self,
        entreprise_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Role>, DomainError> {
        self.roles.find_all(entreprise_id, skip, limit).await
    }

    pub async fn create(&self, mut data: RoleCreate) -> Result<Role, DomainError> {
        if let Some(entreprise_id) = data.entreprise_id {
            if self.entreprises.find_by_id(entreprise_id).await?.is_none() {
                return Err(DomainError::not_found(messages::ENTREPRISE_NOT_FOUND));
            }
        }
        data.code = data.code.trim().to_string();
        if data.code.is_empty() {
            return Err(DomainError::bad_request(messages::DONNEES_INVALIDES));
        }
        if self
            .roles
            .exists_by_entreprise_and_code(data.entreprise_id, &data.code, None)
            .await?
        {
            return Err(DomainError::conflict(messages::ROLE_CODE_EXISTS));
        }
        self.roles.insert(&data).await
    }

    pub async fn update(&self, id: i64, data: RoleUpdate) -> Result<Role, DomainError> {
        let mut role = self.get_or_404(id).await?;
        if let Some(code) = data.code {
            let code = code.trim().to_string();
            if code.is_empty() {
                return Err(DomainError::bad_request(messages::DONNEES_INVALIDES));
            }
            if self
                .roles
                .exists_by_entreprise_and_code(role.entreprise_id, &code, Some(id))
                .await?
            {
                return Err(DomainError::conflict(messages::ROLE_CODE_EXISTS));
            }
            role.code = code;
        }
        if let Some(libelle) = data.libelle {
            role.libelle = libelle;
        }
        self.roles.update(&role).await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, DomainError> {
        self.permissions.find_all().await
    }

    pub async fn grant_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), DomainError> {
        self.get_or_404(role_id).await?;
        if self.permissions.find_by_id(permission_id).await?.is_none() {
            return Err(DomainError::not_found(messages::PERMISSION_NOT_FOUND));
        }
        self.permissions.grant_to_role(role_id, permission_id).await
    }

    pub async fn revoke_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), DomainError> {
        self.get_or_404(role_id).await?;
        let removed = self
            .permissions
            .revoke_from_role(role_id, permission_id)
            .await?;
        if !removed {
            return Err(DomainError::not_found(messages::PERMISSION_ROLE_NOT_FOUND));
        }
        Ok(())
    }
}
