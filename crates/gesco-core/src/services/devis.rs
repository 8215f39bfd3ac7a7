//! Use case Devis

use crate::domain::{Devis, DevisCreate, NewDevis};
use crate::error::{DomainError, ForbiddenCode};
use crate::messages;
use crate::repositories::{DevisRepository, TiersRepository};

pub struct DevisService<D, T>
where
    D: DevisRepository,
    T: TiersRepository,
{
    devis: D,
    tiers: T,
}

impl<D, T> DevisService<D, T>
where
    D: DevisRepository,
    T: TiersRepository,
{
    pub fn new(devis: D, tiers: T) -> Self {
        Self { devis, tiers }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Devis, DomainError> {
        self.devis
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::DEVIS_NOT_FOUND))
    }

    pub async fn list(
        &self,
        entreprise_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Devis>, DomainError> {
        self.devis.find_by_entreprise(entreprise_id, skip, limit).await
    }

    /// Le tiers cible doit exister et appartenir à l'entreprise du principal.
    pub async fn create(
        &self,
        entreprise_id: i64,
        data: DevisCreate,
    ) -> Result<Devis, DomainError> {
        let tiers = self
            .tiers
            .find_by_id(data.tiers_id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::TIERS_NOT_FOUND))?;
        if tiers.entreprise_id != entreprise_id {
            return Err(DomainError::forbidden(
                messages::ENTREPRISE_AUTRE_INTERDITE,
                ForbiddenCode::Entreprise,
            ));
        }
        let numero = data.numero.trim().to_string();
        if numero.is_empty() {
            return Err(DomainError::bad_request(messages::DEVIS_NUMERO_INVALID));
        }
        if data.montant_ht < 0 || data.montant_ttc < 0 {
            return Err(DomainError::bad_request(messages::DEVIS_MONTANT_INVALID));
        }
        self.devis
            .insert(&NewDevis {
                entreprise_id,
                tiers_id: data.tiers_id,
                numero,
                date_devis: data.date_devis,
                montant_ht: data.montant_ht,
                montant_ttc: data.montant_ttc,
                statut: "brouillon".to_string(),
            })
            .await
    }
}
