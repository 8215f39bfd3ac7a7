//! Domain records
//!
//! Plain data; no persistence attributes. Integer ids everywhere, matching
//! the historical schema. Soft-deleted rows keep their id for historical
//! references but never surface through the repositories.

mod devis;
mod entreprise;
pub(crate) mod licence;
mod role;
mod tiers;
mod utilisateur;

pub use devis::{Devis, DevisCreate, NewDevis};
pub use entreprise::{Entreprise, EntrepriseCreate, EntrepriseUpdate};
pub use licence::{Licence, LicenceCreate, LicenceType, LicenceUpdate, LicenceValidite, NewLicence};
pub use role::{PermAction, Permission, Role, RoleCreate, RoleUpdate};
pub use tiers::{Contact, ContactCreate, Tiers, TiersCreate, TiersUpdate};
pub use utilisateur::{NewUtilisateur, Principal, Utilisateur, UtilisateurCreate, UtilisateurUpdate};
