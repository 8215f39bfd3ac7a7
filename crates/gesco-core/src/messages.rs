//! Messages d'erreur et de validation centralisés.
//!
//! Libellés uniques pour toute l'API ; les services les réutilisent pour
//! garantir des réponses cohérentes.

// --- Authentification ---
pub const IDENTIFIANTS_INCORRECTS: &str = "Identifiants incorrects.";
pub const TOKEN_MANQUANT: &str = "Token manquant ou invalide";
pub const TOKEN_INVALIDE_OU_EXPIRE: &str = "Token invalide ou expiré";
pub const TOKEN_INVALIDE: &str = "Token invalide";

// --- Entreprise ---
pub const ENTREPRISE_NOT_FOUND: &str = "Entreprise non trouvée.";
pub const ENTREPRISE_CODE_INVALID: &str = "Le code entreprise ne peut pas être vide.";
pub const ENTREPRISE_CODE_EXISTS: &str = "Une entreprise avec ce code existe déjà.";
pub const ENTREPRISE_AUTRE_INTERDITE: &str = "Accès à une autre entreprise non autorisé";

// --- Rôle ---
pub const ROLE_NOT_FOUND: &str = "Rôle non trouvé.";
pub const ROLE_CODE_EXISTS: &str = "Un rôle avec ce code existe déjà.";

// --- Permission ---
pub const PERMISSION_NOT_FOUND: &str = "Permission non trouvée.";
pub const PERMISSION_ROLE_ALREADY: &str = "Cette permission est déjà affectée à ce rôle.";
pub const PERMISSION_ROLE_NOT_FOUND: &str = "Cette permission n'est pas affectée à ce rôle.";

// --- Utilisateur ---
pub const UTILISATEUR_NOT_FOUND: &str = "Utilisateur non trouvé.";
pub const UTILISATEUR_LOGIN_EXISTS: &str =
    "Un utilisateur avec ce login existe déjà pour cette entreprise.";
pub const UTILISATEUR_DESACTIVE: &str = "Compte utilisateur désactivé.";
pub const UTILISATEUR_LOGIN_INVALID: &str = "Le login ne peut pas être vide.";

// --- Tiers / contacts ---
pub const TIERS_NOT_FOUND: &str = "Tiers non trouvé.";
pub const TIERS_CODE_EXISTS: &str = "Un tiers avec ce code existe déjà pour cette entreprise.";
pub const CONTACT_NOT_FOUND: &str = "Contact non trouvé.";

// --- Devis ---
pub const DEVIS_NOT_FOUND: &str = "Devis non trouvé.";
pub const DEVIS_NUMERO_EXISTS: &str = "Un devis avec ce numéro existe déjà pour cette entreprise.";
pub const DEVIS_NUMERO_INVALID: &str = "Le numéro de devis ne peut pas être vide.";
pub const DEVIS_MONTANT_INVALID: &str = "Les montants doivent être positifs ou nuls.";

// --- Licence ---
pub const LICENCE_NOT_FOUND: &str = "La licence logicielle indiquée n'existe pas.";
pub const LICENCE_CLE_EXISTS: &str = "Une licence avec cette clé existe déjà pour cette entreprise.";
pub const LICENCE_CLE_INVALIDE: &str = "La clé de licence ne peut pas être vide.";
pub const LICENCE_DATE_FIN: &str = "La date de fin doit être postérieure à la date de début.";
pub const LICENCE_EXPIREE: &str = "La licence a expiré (date de fin dépassée).";
pub const LICENCE_INACTIVE: &str = "La licence est désactivée.";
pub const LICENCE_TYPE_INVALIDE: &str = "Type de licence invalide. Valeurs : trial, standard, premium.";
pub const LICENCE_PROLONGATION_MAX: &str = "Nombre maximum de prolongations atteint.";
pub const LICENCE_REQUISE: &str =
    "Aucune licence valide : création de nouveaux documents non autorisée.";
pub const LICENCE_VALIDE: &str = "Licence valide.";

// --- Génériques ---
pub const RESOURCE_NOT_FOUND: &str = "Ressource non trouvée.";
pub const DONNEES_INVALIDES: &str = "Les données fournies sont invalides.";
pub const ERREUR_INTERNE: &str = "Erreur interne du serveur";
pub const TROP_DE_REQUETES: &str = "Trop de requêtes. Réessayez plus tard.";
