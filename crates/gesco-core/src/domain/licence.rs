//! Licences logicielles
//!
//! Une entreprise sans licence actuellement valide conserve l'accès en
//! lecture mais ne peut plus produire de nouveaux documents métier.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::messages;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenceType {
    Trial,
    #[default]
    Standard,
    Premium,
}

impl LicenceType {
    /// Durée accordée par type : trial 2 mois, standard 6, premium 12.
    pub fn duration_months(&self) -> u32 {
        match self {
            LicenceType::Trial => 2,
            LicenceType::Standard => 6,
            LicenceType::Premium => 12,
        }
    }

    /// Prolongations maximum : trial/standard 3, premium illimité.
    pub fn max_extensions(&self) -> Option<i32> {
        match self {
            LicenceType::Trial | LicenceType::Standard => Some(3),
            LicenceType::Premium => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenceType::Trial => "trial",
            LicenceType::Standard => "standard",
            LicenceType::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trial" => Some(LicenceType::Trial),
            "standard" => Some(LicenceType::Standard),
            "premium" => Some(LicenceType::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Licence {
    pub id: i64,
    pub entreprise_id: i64,
    pub licence_key: String,
    pub licence_type: LicenceType,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub is_enabled: bool,
    pub extensions_used: i32,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Licence {
    pub fn is_currently_valid(&self, today: NaiveDate) -> bool {
        self.is_enabled && self.ends_on >= today
    }

    pub fn can_extend(&self) -> bool {
        match self.licence_type.max_extensions() {
            Some(max) => self.extensions_used < max,
            None => true,
        }
    }
}

/// `date + n mois`, borné au dernier jour du mois d'arrivée.
pub(crate) fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Résultat du contrôle de validité pour une entreprise.
#[derive(Debug, Clone, Serialize)]
pub struct LicenceValidite {
    pub valide: bool,
    pub message: String,
    pub date_fin: Option<NaiveDate>,
}

impl LicenceValidite {
    pub fn valide(date_fin: NaiveDate) -> Self {
        Self {
            valide: true,
            message: messages::LICENCE_VALIDE.to_string(),
            date_fin: Some(date_fin),
        }
    }

    pub fn invalide(message: &str, date_fin: Option<NaiveDate>) -> Self {
        Self {
            valide: false,
            message: message.to_string(),
            date_fin,
        }
    }
}

/// Données d'insertion ; `ends_on` est calculée par le service à partir du
/// type.
#[derive(Debug, Clone)]
pub struct NewLicence {
    pub entreprise_id: i64,
    pub licence_key: String,
    pub licence_type: LicenceType,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LicenceCreate {
    pub entreprise_id: i64,
    #[validate(length(min = 1, max = 64))]
    pub licence_key: String,
    #[serde(default = "default_type")]
    pub licence_type: String,
    pub starts_on: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LicenceUpdate {
    pub ends_on: Option<NaiveDate>,
    pub is_enabled: Option<bool>,
}

fn default_type() -> String {
    "standard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn add_months_clamps_month_end() {
        assert_eq!(add_months(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(add_months(d(2026, 3, 15), 6), d(2026, 9, 15));
        assert_eq!(add_months(d(2026, 11, 30), 2), d(2027, 1, 30));
    }

    #[test]
    fn validity_needs_enabled_and_future_end() {
        let lic = Licence {
            id: 1,
            entreprise_id: 1,
            licence_key: "K".into(),
            licence_type: LicenceType::Standard,
            starts_on: d(2026, 1, 1),
            ends_on: d(2026, 7, 1),
            is_enabled: true,
            extensions_used: 0,
            activated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(lic.is_currently_valid(d(2026, 7, 1)));
        assert!(!lic.is_currently_valid(d(2026, 7, 2)));
        let mut off = lic.clone();
        off.is_enabled = false;
        assert!(!off.is_currently_valid(d(2026, 6, 1)));
    }

    #[test]
    fn extension_caps_by_type() {
        assert_eq!(LicenceType::Trial.max_extensions(), Some(3));
        assert_eq!(LicenceType::Premium.max_extensions(), None);
        assert_eq!(LicenceType::Trial.duration_months(), 2);
        assert_eq!(LicenceType::Standard.duration_months(), 6);
        assert_eq!(LicenceType::Premium.duration_months(), 12);
    }
}
