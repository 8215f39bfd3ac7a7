use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Licence, NewLicence};
use crate::error::DomainError;

#[derive(Debug, Clone, Default)]
pub struct LicenceFilter {
    pub entreprise_id: Option<i64>,
    pub actif_only: bool,
    /// Restreint aux licences valides à la date donnée.
    pub valide_on: Option<NaiveDate>,
    pub skip: i64,
    pub limit: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LicenceRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Licence>, DomainError>;

    /// Licence activée dont la fenêtre couvre `today`, la plus récente en
    /// premier.
    async fn find_valid_for_entreprise(
        &self,
        entreprise_id: i64,
        today: NaiveDate,
    ) -> Result<Option<Licence>, DomainError>;

    /// Dernière licence connue de l'entreprise, valide ou non (pour motiver
    /// un refus).
    async fn find_latest_for_entreprise(
        &self,
        entreprise_id: i64,
    ) -> Result<Option<Licence>, DomainError>;

    async fn find_all(&self, filter: &LicenceFilter) -> Result<Vec<Licence>, DomainError>;

    async fn find_by_entreprise_and_key(
        &self,
        entreprise_id: i64,
        key: &str,
    ) -> Result<Option<Licence>, DomainError>;

    async fn insert(&self, licence: &NewLicence) -> Result<Licence, DomainError>;

    async fn update(&self, licence: &Licence) -> Result<Licence, DomainError>;
}
