//! Rôles et permissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Un rôle est scoped à une entreprise ; `entreprise_id` null = rôle système.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    pub id: i64,
    pub entreprise_id: Option<i64>,
    pub code: String,
    pub libelle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermAction {
    #[default]
    Read,
    Write,
}

impl PermAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermAction::Read => "read",
            PermAction::Write => "write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(PermAction::Read),
            "write" => Some(PermAction::Write),
            _ => None,
        }
    }
}

/// Entrée du catalogue de permissions, unique sur `(module, action)`.
#[derive(Debug, Clone, Serialize)]
pub struct Permission {
    pub id: i64,
    pub module: String,
    pub action: PermAction,
    pub libelle: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleCreate {
    pub entreprise_id: Option<i64>,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub libelle: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RoleUpdate {
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub libelle: Option<String>,
}
