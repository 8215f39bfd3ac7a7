//! Use case Licences logicielles
//!
//! Durées par type : trial 2 mois, standard 6, premium 12. Prolongations :
//! trial/standard 3 max, premium illimité.

use chrono::Utc;

use crate::domain::licence::add_months;
use crate::domain::{
    Licence, LicenceCreate, LicenceType, LicenceUpdate, LicenceValidite, NewLicence,
};
use crate::error::DomainError;
use crate::messages;
use crate::repositories::{EntrepriseRepository, LicenceFilter, LicenceRepository};

pub struct LicenceService<L, E>
where
    L: LicenceRepository,
    E: EntrepriseRepository,
{
    licences: L,
    entreprises: E,
}

impl<L, E> LicenceService<L, E>
where
    L: LicenceRepository,
    E: EntrepriseRepository,
{
    pub fn new(licences: L, entreprises: E) -> Self {
        Self {
            licences,
            entreprises,
        }
    }

    pub async fn get_or_404(&self, id: i64) -> Result<Licence, DomainError> {
        self.licences
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::LICENCE_NOT_FOUND))
    }

    pub async fn list(&self, filter: &LicenceFilter) -> Result<Vec<Licence>, DomainError> {
        if let Some(entreprise_id) = filter.entreprise_id {
            if self.entreprises.find_by_id(entreprise_id).await?.is_none() {
                return Err(DomainError::not_found(messages::ENTREPRISE_NOT_FOUND));
            }
        }
        self.licences.find_all(filter).await
    }

    /// Vérifie si l'entreprise dispose d'une licence actuellement valide et
    /// motive le refus le cas échéant.
    pub async fn verifier_validite(
        &self,
        entreprise_id: i64,
    ) -> Result<LicenceValidite, DomainError> {
        let today = Utc::now().date_naive();
        if let Some(licence) = self
            .licences
            .find_valid_for_entreprise(entreprise_id, today)
            .await?
        {
            return Ok(LicenceValidite::valide(licence.ends_on));
        }
        match self.licences.find_latest_for_entreprise(entreprise_id).await? {
            Some(derniere) if !derniere.is_enabled => Ok(LicenceValidite::invalide(
                messages::LICENCE_INACTIVE,
                Some(derniere.ends_on),
            )),
            Some(derniere) => Ok(LicenceValidite::invalide(
                messages::LICENCE_EXPIREE,
                Some(derniere.ends_on),
            )),
            None => Ok(LicenceValidite::invalide(messages::LICENCE_NOT_FOUND, None)),
        }
    }

    pub async fn create(&self, data: LicenceCreate) -> Result<Licence, DomainError> {
        if self
            .entreprises
            .find_by_id(data.entreprise_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found(messages::ENTREPRISE_NOT_FOUND));
        }
        let key = data.licence_key.trim().to_uppercase();
        if key.is_empty() {
            return Err(DomainError::bad_request(messages::LICENCE_CLE_INVALIDE));
        }
        if self
            .licences
            .find_by_entreprise_and_key(data.entreprise_id, &key)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(messages::LICENCE_CLE_EXISTS));
        }
        let licence_type = LicenceType::parse(&data.licence_type)
            .ok_or_else(|| DomainError::bad_request(messages::LICENCE_TYPE_INVALIDE))?;
        let ends_on = add_months(data.starts_on, licence_type.duration_months());
        self.licences
            .insert(&NewLicence {
                entreprise_id: data.entreprise_id,
                licence_key: key,
                licence_type,
                starts_on: data.starts_on,
                ends_on,
            })
            .await
    }

    pub async fn update(&self, id: i64, data: LicenceUpdate) -> Result<Licence, DomainError> {
        let mut licence = self.get_or_404(id).await?;
        if let Some(ends_on) = data.ends_on {
            if ends_on <= licence.starts_on {
                return Err(DomainError::bad_request(messages::LICENCE_DATE_FIN));
            }
            licence.ends_on = ends_on;
        }
        if let Some(is_enabled) = data.is_enabled {
            licence.is_enabled = is_enabled;
        }
        self.licences.update(&licence).await
    }

    /// Marque la licence activée (première activation seulement).
    pub async fn activer(&self, id: i64) -> Result<Licence, DomainError> {
        let mut licence = self.get_or_404(id).await?;
        if licence.activated_at.is_none() {
            licence.activated_at = Some(Utc::now());
        }
        self.licences.update(&licence).await
    }

    /// Prolonge la licence de la durée de son type, dans la limite des
    /// prolongations autorisées.
    pub async fn prolonger(&self, id: i64) -> Result<Licence, DomainError> {
        let mut licence = self.get_or_404(id).await?;
        if !licence.is_enabled {
            return Err(DomainError::bad_request(messages::LICENCE_INACTIVE));
        }
        if !licence.can_extend() {
            return Err(DomainError::bad_request(messages::LICENCE_PROLONGATION_MAX));
        }
        licence.ends_on = add_months(licence.ends_on, licence.licence_type.duration_months());
        licence.extensions_used += 1;
        self.licences.update(&licence).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::repositories::{MockEntrepriseRepository, MockLicenceRepository};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn licence(licence_type: LicenceType, extensions_used: i32, enabled: bool) -> Licence {
        Licence {
            id: 9,
            entreprise_id: 1,
            licence_key: "GESCO-KEY".into(),
            licence_type,
            starts_on: d(2026, 1, 1),
            ends_on: d(2026, 7, 1),
            is_enabled: enabled,
            extensions_used,
            activated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn prolonger_extends_by_type_duration() {
        let mut licences = MockLicenceRepository::new();
        licences
            .expect_find_by_id()
            .returning(|_| Ok(Some(licence(LicenceType::Standard, 0, true))));
        licences
            .expect_update()
            .returning(|l| Ok(l.clone()));
        let svc = LicenceService::new(licences, MockEntrepriseRepository::new());

        let updated = svc.prolonger(9).await.unwrap();
        assert_eq!(updated.ends_on, d(2027, 1, 1));
        assert_eq!(updated.extensions_used, 1);
    }

    #[tokio::test]
    async fn prolonger_respects_extension_cap() {
        let mut licences = MockLicenceRepository::new();
        licences
            .expect_find_by_id()
            .returning(|_| Ok(Some(licence(LicenceType::Trial, 3, true))));
        let svc = LicenceService::new(licences, MockEntrepriseRepository::new());
        assert!(matches!(
            svc.prolonger(9).await,
            Err(DomainError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn prolonger_refuses_disabled_licence() {
        let mut licences = MockLicenceRepository::new();
        licences
            .expect_find_by_id()
            .returning(|_| Ok(Some(licence(LicenceType::Premium, 10, false))));
        let svc = LicenceService::new(licences, MockEntrepriseRepository::new());
        assert!(matches!(
            svc.prolonger(9).await,
            Err(DomainError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn validite_reports_expired_licence() {
        let mut licences = MockLicenceRepository::new();
        licences
            .expect_find_valid_for_entreprise()
            .returning(|_, _| Ok(None));
        licences
            .expect_find_latest_for_entreprise()
            .returning(|_| Ok(Some(licence(LicenceType::Standard, 0, true))));
        let svc = LicenceService::new(licences, MockEntrepriseRepository::new());

        let v = svc.verifier_validite(1).await.unwrap();
        assert!(!v.valide);
        assert_eq!(v.message, messages::LICENCE_EXPIREE);
        assert_eq!(v.date_fin, Some(d(2026, 7, 1)));
    }
}
