//! Contrôle d'accès : permissions, isolation multi-tenant, licence
//!
//! Les trois portes sont orthogonales et composées par les handlers dans
//! l'ordre permission → entreprise → licence. Tout refus court-circuite la
//! requête et déclenche le rollback de la transaction courante.

use chrono::Utc;

use crate::domain::{PermAction, Principal};
use crate::error::{DomainError, ForbiddenCode};
use crate::messages;
use crate::repositories::{LicenceRepository, PermissionRepository};

/// Modules produisant des documents métier : l'écriture y est conditionnée à
/// une licence valide.
const LICENCE_GATED_MODULES: [&str; 3] = ["commercial", "achats", "paie"];

pub struct AccessControl<P: PermissionRepository, L: LicenceRepository> {
    permissions: P,
    licences: L,
    /// Un rôle sans grant configuré passe quand vrai (rétrocompatibilité
    /// avec les données antérieures aux permissions fines).
    default_open: bool,
}

impl<P: PermissionRepository, L: LicenceRepository> AccessControl<P, L> {
    pub fn new(permissions: P, licences: L, default_open: bool) -> Self {
        Self {
            permissions,
            licences,
            default_open,
        }
    }

    /// Exige la permission `(module, action)` pour le rôle du principal.
    pub async fn require_permission(
        &self,
        principal: &Principal,
        module: &str,
        action: PermAction,
    ) -> Result<(), DomainError> {
        let grants = self
            .permissions
            .find_permissions_by_role_id(principal.role_id)
            .await?;
        if grants.is_empty() {
            if self.default_open {
                return Ok(());
            }
            return Err(DomainError::forbidden(
                format!("Permission requise : {module}.{}", action.as_str()),
                ForbiddenCode::Permission,
            ));
        }
        let allowed = grants
            .iter()
            .any(|(m, a)| m == module && *a == action);
        if allowed {
            Ok(())
        } else {
            Err(DomainError::forbidden(
                format!("Permission requise : {module}.{}", action.as_str()),
                ForbiddenCode::Permission,
            ))
        }
    }

    /// Écriture sur un module à documents métier : licence valide exigée.
    /// Les lectures passent toujours.
    pub async fn require_licence(
        &self,
        principal: &Principal,
        module: &str,
        action: PermAction,
    ) -> Result<(), DomainError> {
        if action != PermAction::Write || !LICENCE_GATED_MODULES.contains(&module) {
            return Ok(());
        }
        let today = Utc::now().date_naive();
        match self
            .licences
            .find_valid_for_entreprise(principal.entreprise_id, today)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(DomainError::forbidden(
                messages::LICENCE_REQUISE,
                ForbiddenCode::Licence,
            )),
        }
    }
}

/// Refuse tout accès à une autre entreprise que celle du principal.
pub fn require_tenant(principal: &Principal, target_entreprise_id: i64) -> Result<(), DomainError> {
    if target_entreprise_id != principal.entreprise_id {
        return Err(DomainError::forbidden(
            messages::ENTREPRISE_AUTRE_INTERDITE,
            ForbiddenCode::Entreprise,
        ));
    }
    Ok(())
}

/// Filtre `entreprise_id` des listes : absent = entreprise du principal,
/// présent = doit correspondre.
pub fn validated_entreprise_id(
    principal: &Principal,
    requested: Option<i64>,
) -> Result<i64, DomainError> {
    match requested {
        None => Ok(principal.entreprise_id),
        Some(id) => {
            require_tenant(principal, id)?;
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repositories::{MockLicenceRepository, MockPermissionRepository};

    fn principal() -> Principal {
        Principal {
            user_id: 5,
            entreprise_id: 1,
            role_id: 3,
            is_active: true,
        }
    }

    fn control(
        grants: Vec<(String, PermAction)>,
        default_open: bool,
    ) -> AccessControl<MockPermissionRepository, MockLicenceRepository> {
        let mut perms = MockPermissionRepository::new();
        perms
            .expect_find_permissions_by_role_id()
            .returning(move |_| Ok(grants.clone()));
        AccessControl::new(perms, MockLicenceRepository::new(), default_open)
    }

    #[tokio::test]
    async fn empty_grants_pass_when_default_open() {
        let access = control(vec![], true);
        assert!(access
            .require_permission(&principal(), "parametrage", PermAction::Read)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn empty_grants_deny_when_default_closed() {
        let access = control(vec![], false);
        let err = access
            .require_permission(&principal(), "parametrage", PermAction::Read)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Forbidden {
                code: ForbiddenCode::Permission,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn explicit_grants_gate_module_and_action() {
        let access = control(vec![("parametrage".into(), PermAction::Read)], true);
        assert!(access
            .require_permission(&principal(), "parametrage", PermAction::Read)
            .await
            .is_ok());
        let err = access
            .require_permission(&principal(), "parametrage", PermAction::Write)
            .await
            .unwrap_err();
        match err {
            DomainError::Forbidden { detail, code } => {
                assert_eq!(code, ForbiddenCode::Permission);
                assert_eq!(detail, "Permission requise : parametrage.write");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(access
            .require_permission(&principal(), "commercial", PermAction::Read)
            .await
            .is_err());
    }

    #[test]
    fn tenant_mismatch_is_forbidden() {
        let p = principal();
        assert!(require_tenant(&p, 1).is_ok());
        let err = require_tenant(&p, 2).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Forbidden {
                code: ForbiddenCode::Entreprise,
                ..
            }
        ));
    }

    #[test]
    fn entreprise_filter_defaults_to_principal() {
        let p = principal();
        assert_eq!(validated_entreprise_id(&p, None).unwrap(), 1);
        assert_eq!(validated_entreprise_id(&p, Some(1)).unwrap(), 1);
        assert!(validated_entreprise_id(&p, Some(2)).is_err());
    }

    #[tokio::test]
    async fn licence_gate_blocks_writes_without_valid_licence() {
        let perms = MockPermissionRepository::new();
        let mut licences = MockLicenceRepository::new();
        licences
            .expect_find_valid_for_entreprise()
            .returning(|_, _| Ok(None));
        let access = AccessControl::new(perms, licences, true);

        let err = access
            .require_licence(&principal(), "commercial", PermAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Forbidden {
                code: ForbiddenCode::Licence,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn licence_gate_lets_reads_and_ungated_modules_through() {
        // Le repo licence ne doit même pas être interrogé.
        let access = AccessControl::new(
            MockPermissionRepository::new(),
            MockLicenceRepository::new(),
            true,
        );
        assert!(access
            .require_licence(&principal(), "commercial", PermAction::Read)
            .await
            .is_ok());
        assert!(access
            .require_licence(&principal(), "parametrage", PermAction::Write)
            .await
            .is_ok());
    }
}
