//! Authentification : login et rafraîchissement de tokens
//!
//! Les échecs de login sont volontairement uniformes (même statut, même
//! forme de réponse) pour ne pas permettre l'énumération des comptes ; seul
//! le libellé du compte désactivé diffère.

use std::sync::Arc;

use tracing::warn;

use gesco_security::jwt::{JwtCodec, TokenKind};
use gesco_security::password::PasswordService;

use crate::domain::Utilisateur;
use crate::error::DomainError;
use crate::messages;
use crate::repositories::UtilisateurRepository;

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService<R: UtilisateurRepository> {
    users: R,
    jwt: Arc<JwtCodec>,
    passwords: PasswordService,
}

impl<R: UtilisateurRepository> AuthService<R> {
    pub fn new(users: R, jwt: Arc<JwtCodec>, passwords: PasswordService) -> Self {
        Self {
            users,
            jwt,
            passwords,
        }
    }

    /// Vérifie `(entreprise_id, login ou email, mot de passe)` et retourne
    /// une paire access/refresh. Met à jour `last_login_at`.
    pub async fn login(
        &self,
        entreprise_id: i64,
        login: &str,
        password: &str,
    ) -> Result<TokenPair, DomainError> {
        let login = login.trim();
        let user = self
            .users
            .find_by_entreprise_and_login(entreprise_id, login)
            .await?;
        let user = match user {
            Some(u) => u,
            None => {
                warn!(entreprise_id, "login refusé : utilisateur inconnu");
                return Err(DomainError::unauthorized(messages::IDENTIFIANTS_INCORRECTS));
            }
        };
        if !user.is_active {
            warn!(user_id = user.id, "login refusé : compte désactivé");
            return Err(DomainError::unauthorized(messages::UTILISATEUR_DESACTIVE));
        }
        if !self.passwords.verify(password, &user.password_hash) {
            warn!(user_id = user.id, "login refusé : mot de passe incorrect");
            return Err(DomainError::unauthorized(messages::IDENTIFIANTS_INCORRECTS));
        }

        let pair = self.mint_pair(&user)?;
        self.users.record_login(user.id).await?;
        Ok(pair)
    }

    /// Rotation : vérifie le refresh token, recontrôle la vivacité de
    /// l'utilisateur et émet une nouvelle paire.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let claims = self
            .jwt
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| DomainError::unauthorized(messages::TOKEN_INVALIDE_OU_EXPIRE))?;
        let user_id = claims
            .subject_id()
            .map_err(|_| DomainError::unauthorized(messages::TOKEN_INVALIDE))?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::unauthorized(messages::UTILISATEUR_NOT_FOUND))?;
        if !user.is_active {
            return Err(DomainError::unauthorized(messages::UTILISATEUR_DESACTIVE));
        }
        self.mint_pair(&user)
    }

    fn mint_pair(&self, user: &Utilisateur) -> Result<TokenPair, DomainError> {
        let access_token = self
            .jwt
            .mint_access(user.id, user.entreprise_id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let refresh_token = self
            .jwt
            .mint_refresh(user.id, user.entreprise_id)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::repositories::MockUtilisateurRepository;

    fn codec() -> Arc<JwtCodec> {
        Arc::new(
            JwtCodec::new(
                "test-secret-key-of-sufficient-length".to_string(),
                "HS256",
                60,
                7,
            )
            .unwrap(),
        )
    }

    fn passwords() -> PasswordService {
        PasswordService::new(4)
    }

    fn user(id: i64, entreprise_id: i64, hash: &str, active: bool) -> Utilisateur {
        Utilisateur {
            id,
            entreprise_id,
            role_id: 1,
            login: "admin".into(),
            email: Some("admin@gesco.cm".into()),
            nom: None,
            prenom: None,
            password_hash: hash.into(),
            is_active: active,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn login_success_returns_both_tokens() {
        let pw = passwords();
        let hash = pw.hash("gesco@1234").unwrap();
        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_entreprise_and_login()
            .with(eq(1), eq("admin"))
            .returning(move |_, _| Ok(Some(user(5, 1, &hash, true))));
        repo.expect_record_login().with(eq(5)).returning(|_| Ok(()));

        let svc = AuthService::new(repo, codec(), pw);
        let pair = svc.login(1, " admin ", "gesco@1234").await.unwrap();
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let claims = codec()
            .verify(&pair.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.subject_id().unwrap(), 5);
        assert_eq!(claims.ent, 1);
    }

    #[tokio::test]
    async fn login_wrong_password_is_uniform() {
        let pw = passwords();
        let hash = pw.hash("gesco@1234").unwrap();
        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_entreprise_and_login()
            .returning(move |_, _| Ok(Some(user(5, 1, &hash, true))));

        let svc = AuthService::new(repo, codec(), pw);
        let err = svc.login(1, "admin", "wrong").await.unwrap_err();
        match err {
            DomainError::Unauthorized(detail) => {
                assert_eq!(detail, messages::IDENTIFIANTS_INCORRECTS)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_unknown_user_is_uniform() {
        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_entreprise_and_login()
            .returning(|_, _| Ok(None));

        let svc = AuthService::new(repo, codec(), passwords());
        let err = svc.login(1, "ghost", "whatever").await.unwrap_err();
        match err {
            DomainError::Unauthorized(detail) => {
                assert_eq!(detail, messages::IDENTIFIANTS_INCORRECTS)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_inactive_user_is_refused() {
        let pw = passwords();
        let hash = pw.hash("gesco@1234").unwrap();
        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_entreprise_and_login()
            .returning(move |_, _| Ok(Some(user(5, 1, &hash, false))));

        let svc = AuthService::new(repo, codec(), pw);
        let err = svc.login(1, "admin", "gesco@1234").await.unwrap_err();
        match err {
            DomainError::Unauthorized(detail) => {
                assert_eq!(detail, messages::UTILISATEUR_DESACTIVE)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_rotates_tokens_for_live_user() {
        let pw = passwords();
        let hash = pw.hash("gesco@1234").unwrap();
        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_id()
            .with(eq(5))
            .returning(move |_| Ok(Some(user(5, 1, &hash, true))));

        let jwt = codec();
        let refresh = jwt.mint_refresh(5, 1).unwrap();
        let svc = AuthService::new(repo, jwt.clone(), pw);
        let pair = svc.refresh(&refresh).await.unwrap();
        let claims = jwt.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 5);
        assert!(jwt.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
    }

    #[tokio::test]
    async fn refresh_refuses_access_token() {
        let repo = MockUtilisateurRepository::new();
        let jwt = codec();
        let access = jwt.mint_access(5, 1).unwrap();
        let svc = AuthService::new(repo, jwt, passwords());
        assert!(matches!(
            svc.refresh(&access).await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn refresh_refuses_tombstoned_or_inactive_user() {
        let pw = passwords();
        let hash = pw.hash("gesco@1234").unwrap();
        let mut repo = MockUtilisateurRepository::new();
        // Tombstoned rows never come back from the repository.
        repo.expect_find_by_id().returning(|_| Ok(None));
        let jwt = codec();
        let refresh = jwt.mint_refresh(5, 1).unwrap();
        let svc = AuthService::new(repo, jwt.clone(), pw.clone());
        assert!(matches!(
            svc.refresh(&refresh).await,
            Err(DomainError::Unauthorized(_))
        ));

        let mut repo = MockUtilisateurRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user(5, 1, &hash, false))));
        let svc = AuthService::new(repo, jwt, pw);
        assert!(matches!(
            svc.refresh(&refresh).await,
            Err(DomainError::Unauthorized(_))
        ));
    }
}
