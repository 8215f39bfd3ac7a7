//! Use case Utilisateur (par entreprise)

use gesco_security::password::PasswordService;

use crate::domain::{NewUtilisateur, Utilisateur, UtilisateurCreate, UtilisateurUpdate};
use crate::error::DomainError;
use crate::messages;
use crate::repositories::{
    EntrepriseRepository, PageFilter, RoleRepository, UtilisateurRepository,
};

pub struct UtilisateurService<U, E, R>
where
    U: UtilisateurRepository,
    E: EntrepriseRepository,
    R: RoleRepository,
{
    users: U,
    entreprises: E,
    roles: R,
    passwords: PasswordService,
}

impl<U, E, R> UtilisateurService<U, E, R>
where
    U: UtilisateurRepository,
    E: EntrepriseRepository,
    R: RoleRepository,
{
    pub fn new(users: U, entreprises: E, roles: R, passwords: PasswordService) -> Self {
        Self {
            users,
            entreprises,
            roles,
            passwords,
        }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Utilisateur, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::UTILISATEUR_NOT_FOUND))
    }

    pub async fn list(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Utilisateur>, DomainError> {
        if self.entreprises.find_by_id(entreprise_id).await?.is_none() {
            return Err(DomainError::not_found(messages::ENTREPRISE_NOT_FOUND));
        }
        self.users.find_by_entreprise(entreprise_id, filter).await
    }

    pub async fn create(&self, data: UtilisateurCreate) -> Result<Utilisateur, DomainError> {
        if self
            .entreprises
            .find_by_id(data.entreprise_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found(messages::ENTREPRISE_NOT_FOUND));
        }
        if self.roles.find_by_id(data.role_id).await?.is_none() {
            return Err(DomainError::not_found(messages::ROLE_NOT_FOUND));
        }
        let login = data.login.trim().to_string();
        if login.is_empty() {
            return Err(DomainError::bad_request(messages::UTILISATEUR_LOGIN_INVALID));
        }
        if self
            .users
            .find_by_entreprise_and_login(data.entreprise_id, &login)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(messages::UTILISATEUR_LOGIN_EXISTS));
        }
        let password_hash = self
            .passwords
            .hash(&data.mot_de_passe)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let new_user = NewUtilisateur {
            entreprise_id: data.entreprise_id,
            role_id: data.role_id,
            login,
            email: data.email,
            nom: data.nom,
            prenom: data.prenom,
            password_hash,
            is_active: data.is_active,
        };
        self.users.insert(&new_user).await
    }

    pub async fn update(
        &self,
        id: i64,
        data: UtilisateurUpdate,
    ) -> Result<Utilisateur, DomainError> {
        let mut user = self.get_or_404(id).await?;
        if let Some(role_id) = data.role_id {
            if self.roles.find_by_id(role_id).await?.is_none() {
                return Err(DomainError::not_found(messages::ROLE_NOT_FOUND));
            }
            user.role_id = role_id;
        }
        if let Some(mot_de_passe) = data.mot_de_passe {
            user.password_hash = self
                .passwords
                .hash(&mot_de_passe)
                .map_err(|e| DomainError::Internal(e.to_string()))?;
        }
        if let Some(email) = data.email {
            user.email = Some(email);
        }
        if let Some(nom) = data.nom {
            user.nom = Some(nom);
        }
        if let Some(prenom) = data.prenom {
            user.prenom = Some(prenom);
        }
        if let Some(is_active) = data.is_active {
            user.is_active = is_active;
        }
        self.users.update(&user).await
    }

    pub async fn delete_soft(&self, id: i64) -> Result<(), DomainError> {
        self.get_or_404(id).await?;
        self.users.soft_delete(id).await
    }
}
