//! Use case Tiers et contacts
//!
//! Les contacts n'ont pas d'entreprise propre : elle se résout via le tiers
//! parent (`owning_entreprise_of_contact`), avant tout accès.

use crate::domain::{Contact, ContactCreate, Tiers, TiersCreate, TiersUpdate};
use crate::error::DomainError;
use crate::messages;
use crate::repositories::{ContactRepository, PageFilter, TiersRepository};

pub struct TiersService<T, C>
where
    T: TiersRepository,
    C: ContactRepository,
{
    tiers: T,
    contacts: C,
}

impl<T, C> TiersService<T, C>
where
    T: TiersRepository,
    C: ContactRepository,
{
    pub fn new(tiers: T, contacts: C) -> Self {
        Self { tiers, contacts }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Tiers, DomainError> {
        self.tiers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::TIERS_NOT_FOUND))
    }

    pub async fn list(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Tiers>, DomainError> {
        self.tiers.find_by_entreprise(entreprise_id, filter).await
    }

    pub async fn create(
        &self,
        entreprise_id: i64,
        mut data: TiersCreate,
    ) -> Result<Tiers, DomainError> {
        data.code = data.code.trim().to_string();
        if data.code.is_empty() {
            return Err(DomainError::bad_request(messages::DONNEES_INVALIDES));
        }
        if self
            .tiers
            .exists_by_entreprise_and_code(entreprise_id, &data.code, None)
            .await?
        {
            return Err(DomainError::conflict(messages::TIERS_CODE_EXISTS));
        }
        self.tiers.insert(entreprise_id, &data).await
    }

    pub async fn update(&self, id: i64, data: TiersUpdate) -> Result<Tiers, DomainError> {
        let mut tiers = self.get_or_404(id).await?;
        if let Some(raison_sociale) = data.raison_sociale {
            tiers.raison_sociale = raison_sociale;
        }
        if let Some(niu) = data.niu {
            tiers.niu = Some(niu);
        }
        if let Some(ville) = data.ville {
            tiers.ville = Some(ville);
        }
        if let Some(telephone) = data.telephone {
            tiers.telephone = Some(telephone);
        }
        if let Some(email) = data.email {
            tiers.email = Some(email);
        }
        if let Some(is_active) = data.is_active {
            tiers.is_active = is_active;
        }
        self.tiers.update(&tiers).await
    }

    pub async fn delete_soft(&self, id: i64) -> Result<(), DomainError> {
        self.get_or_404(id).await?;
        self.tiers.soft_delete(id).await
    }

    // --- Contacts ---

    pub async fn get_contact_or_404(&self, id: i64) -> Result<Contact, DomainError> {
        self.contacts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::CONTACT_NOT_FOUND))
    }

    pub async fn list_contacts(&self, tiers_id: i64) -> Result<Vec<Contact>, DomainError> {
        self.get_or_404(tiers_id).await?;
        self.contacts.find_by_tiers(tiers_id).await
    }

    pub async fn create_contact(
        &self,
        tiers_id: i64,
        data: ContactCreate,
    ) -> Result<Contact, DomainError> {
        self.get_or_404(tiers_id).await?;
        self.contacts.insert(tiers_id, &data).await
    }

    pub async fn delete_contact(&self, id: i64) -> Result<(), DomainError> {
        let removed = self.contacts.delete(id).await?;
        if !removed {
            return Err(DomainError::not_found(messages::CONTACT_NOT_FOUND));
        }
        Ok(())
    }

    /// Entreprise propriétaire d'un contact, via son tiers parent.
    pub async fn owning_entreprise_of_contact(&self, contact_id: i64) -> Result<i64, DomainError> {
        let contact = self.get_contact_or_404(contact_id).await?;
        let tiers = self.get_or_404(contact.tiers_id).await?;
        Ok(tiers.entreprise_id)
    }
}
