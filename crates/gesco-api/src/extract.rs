//! Extracteurs de requête
//!
//! [`DbTx`] récupère la transaction ouverte par le middleware ;
//! [`CurrentUser`] résout le principal à partir du header `Authorization`.
//! Le header accepte `Bearer <token>` (casse libre) ou le token brut, par
//! compatibilité avec les clients existants.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::error;

use gesco_core::domain::Principal;
use gesco_core::messages;
use gesco_core::repositories::UtilisateurRepository;
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::PgUtilisateurRepository;
use gesco_security::jwt::TokenKind;

use crate::error::ApiError;
use crate::state::AppState;

/// Token porteur extrait du header `Authorization`, préfixe `Bearer`
/// optionnel et insensible à la casse.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    let token = match raw.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => raw[7..].trim(),
        _ => raw,
    };
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Transaction de la requête courante, injectée par le middleware.
pub struct DbTx(pub Tx);

impl<S: Send + Sync> FromRequestParts<S> for DbTx {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Tx>()
            .cloned()
            .map(DbTx)
            .ok_or_else(|| {
                error!("request transaction missing from extensions");
                ApiError::internal()
            })
    }
}

/// Principal authentifié. Le token fournit l'identité ; la ligne utilisateur
/// (vivante et active) fait foi pour l'entreprise et le rôle.
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let tx = parts.extensions.get::<Tx>().cloned().ok_or_else(|| {
            error!("request transaction missing from extensions");
            ApiError::internal()
        })?;
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized(messages::TOKEN_MANQUANT))?;
        let claims = state
            .jwt
            .verify(&token, TokenKind::Access)
            .map_err(|_| ApiError::unauthorized(messages::TOKEN_INVALIDE_OU_EXPIRE))?;
        let user_id = claims
            .subject_id()
            .map_err(|_| ApiError::unauthorized(messages::TOKEN_INVALIDE))?;

        let users = PgUtilisateurRepository::new(tx);
        let user = users
            .find_by_id(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized(messages::UTILISATEUR_NOT_FOUND))?;
        if !user.is_active {
            return Err(ApiError::unauthorized(messages::UTILISATEUR_DESACTIVE));
        }
        Ok(CurrentUser(Principal::from(&user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_prefix_any_case() {
        assert_eq!(bearer_token(&headers("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&headers("BEARER  abc ")).as_deref(), Some("abc"));
    }

    #[test]
    fn raw_token_without_prefix() {
        assert_eq!(bearer_token(&headers("abc.def.ghi")).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_values_yield_none() {
        assert_eq!(bearer_token(&headers("")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
