//! Utilisateur et principal authentifié

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Utilisateur {
    pub id: i64,
    pub entreprise_id: i64,
    pub role_id: i64,
    pub login: String,
    pub email: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// L'utilisateur agissant, réduit aux champs utiles à l'autorisation.
/// Le `entreprise_id` fait foi : c'est celui de la ligne utilisateur,
/// pas celui du token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub entreprise_id: i64,
    pub role_id: i64,
    pub is_active: bool,
}

impl From<&Utilisateur> for Principal {
    fn from(u: &Utilisateur) -> Self {
        Self {
            user_id: u.id,
            entreprise_id: u.entreprise_id,
            role_id: u.role_id,
            is_active: u.is_active,
        }
    }
}

/// Données d'insertion (mot de passe déjà haché par le service).
#[derive(Debug, Clone)]
pub struct NewUtilisateur {
    pub entreprise_id: i64,
    pub role_id: i64,
    pub login: String,
    pub email: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UtilisateurCreate {
    pub entreprise_id: i64,
    pub role_id: i64,
    #[validate(length(min = 1, max = 50))]
    pub login: String,
    #[validate(email)]
    pub email: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    #[validate(length(min = 8))]
    pub mot_de_passe: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UtilisateurUpdate {
    pub role_id: Option<i64>,
    #[validate(email)]
    pub email: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    #[validate(length(min = 8))]
    pub mot_de_passe: Option<String>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}
