//! Tiers (clients et fournisseurs) et leurs contacts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Tiers {
    pub id: i64,
    pub entreprise_id: i64,
    pub code: String,
    pub raison_sociale: String,
    pub niu: Option<String>,
    pub ville: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Contact rattaché à un tiers ; l'entreprise propriétaire se résout via le
/// tiers.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub tiers_id: i64,
    pub nom: String,
    pub fonction: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TiersCreate {
    #[validate(length(min = 1, max = 30))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub raison_sociale: String,
    #[validate(length(max = 20))]
    pub niu: Option<String>,
    pub ville: Option<String>,
    pub telephone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TiersUpdate {
    #[validate(length(min = 1, max = 255))]
    pub raison_sociale: Option<String>,
    #[validate(length(max = 20))]
    pub niu: Option<String>,
    pub ville: Option<String>,
    pub telephone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactCreate {
    #[validate(length(min = 1, max = 150))]
    pub nom: String,
    pub fonction: Option<String>,
    pub telephone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
