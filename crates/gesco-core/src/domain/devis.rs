//! Devis clients
//!
//! Montants en FCFA entiers (XAF, zéro décimale).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Devis {
    pub id: i64,
    pub entreprise_id: i64,
    pub tiers_id: i64,
    pub numero: String,
    pub date_devis: NaiveDate,
    pub montant_ht: i64,
    pub montant_ttc: i64,
    pub statut: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Données d'insertion, entreprise résolue et numéro nettoyé par le service.
#[derive(Debug, Clone)]
pub struct NewDevis {
    pub entreprise_id: i64,
    pub tiers_id: i64,
    pub numero: String,
    pub date_devis: NaiveDate,
    pub montant_ht: i64,
    pub montant_ttc: i64,
    pub statut: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DevisCreate {
    pub tiers_id: i64,
    #[validate(length(min = 1, max = 30))]
    pub numero: String,
    pub date_devis: NaiveDate,
    pub montant_ht: i64,
    pub montant_ttc: i64,
}
