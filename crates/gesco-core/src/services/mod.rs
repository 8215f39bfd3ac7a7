//! Application services
//!
//! Un service par ressource, construit au fil de la requête sur les
//! repositories branchés sur la transaction courante. Aucun service ne
//! commit : la portée transactionnelle appartient à la couche HTTP.

pub mod access;
pub mod auth;
pub mod devis;
pub mod entreprise;
pub mod licence;
pub mod role;
pub mod tiers;
pub mod utilisateur;

pub use access::{require_tenant, validated_entreprise_id, AccessControl};
pub use auth::{AuthService, TokenPair};
pub use devis::DevisService;
pub use entreprise::EntrepriseService;
pub use licence::LicenceService;
pub use role::RoleService;
pub use tiers::TiersService;
pub use utilisateur::UtilisateurService;
