//! Use case Entreprise

use crate::domain::{Entreprise, EntrepriseCreate, EntrepriseUpdate};
use crate::error::DomainError;
use crate::messages;
use crate::repositories::{EntrepriseRepository, PageFilter};

pub struct EntrepriseService<E: EntrepriseRepository> {
    repo: E,
}

impl<E: EntrepriseRepository> EntrepriseService<E> {
    pub fn new(repo: E) -> Self {
        Self { repo }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Entreprise, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::ENTREPRISE_NOT_FOUND))
    }

    pub async fn list(&self, filter: &PageFilter) -> Result<Vec<Entreprise>, DomainError> {
        self.repo.find_all(filter).await
    }

    pub async fn create(&self, mut data: EntrepriseCreate) -> Result<Entreprise, DomainError> {
        data.code = data.code.trim().to_string();
        if data.code.is_empty() {
            return Err(DomainError::bad_request(messages::ENTREPRISE_CODE_INVALID));
        }
        if self.repo.exists_by_code(&data.code, None).await? {
            return Err(DomainError::conflict(messages::ENTREPRISE_CODE_EXISTS));
        }
        self.repo.insert(&data).await
    }

    pub async fn update(
        &self,
        id: i64,
        data: EntrepriseUpdate,
    ) -> Result<Entreprise, DomainError> {
        let mut entreprise = self.get_or_404(id).await?;
        if let Some(raison_sociale) = data.raison_sociale {
            entreprise.raison_sociale = raison_sociale;
        }
        if let Some(niu) = data.niu {
            entreprise.niu = Some(niu);
        }
        if let Some(is_active) = data.is_active {
            entreprise.is_active = is_active;
        }
        self.repo.update(&entreprise).await
    }

    pub async fn delete_soft(&self, id: i64) -> Result<(), DomainError> {
        self.get_or_404(id).await?;
        self.repo.soft_delete(id).await
    }
}
