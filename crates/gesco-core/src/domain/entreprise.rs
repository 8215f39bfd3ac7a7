//! Entreprise (tenant)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Entreprise {
    pub id: i64,
    pub code: String,
    pub raison_sociale: String,
    /// Numéro d'identifiant unique (DGI Cameroun).
    pub niu: Option<String>,
    pub pays: String,
    pub devise_principale: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EntrepriseCreate {
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub raison_sociale: String,
    #[validate(length(max = 20))]
    pub niu: Option<String>,
    #[serde(default = "default_pays")]
    #[validate(length(equal = 3))]
    pub pays: String,
    #[serde(default = "default_devise")]
    #[validate(length(equal = 3))]
    pub devise_principale: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EntrepriseUpdate {
    #[validate(length(min = 1, max = 255))]
    pub raison_sociale: Option<String>,
    #[validate(length(max = 20))]
    pub niu: Option<String>,
    pub is_active: Option<bool>,
}

fn default_pays() -> String {
    "CMR".to_string()
}

fn default_devise() -> String {
    "XAF".to_string()
}
