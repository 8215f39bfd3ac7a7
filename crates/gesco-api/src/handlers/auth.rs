//! Authentification : login et refresh

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use gesco_core::services::AuthService;
use gesco_infrastructure::postgres::PgUtilisateurRepository;

use crate::error::{validate_payload, ApiError};
use crate::extract::DbTx;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub entreprise_id: i64,
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
}

impl TokenResponse {
    fn bearer(pair: gesco_core::services::TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            token_type: "bearer".to_string(),
            refresh_token: pair.refresh_token,
        }
    }
}

/// POST /auth/login — authentification par entreprise, login (ou email) et
/// mot de passe.
pub async fn login(
    State(state): State<AppState>,
    DbTx(tx): DbTx,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_payload(&payload)?;
    let service = AuthService::new(
        PgUtilisateurRepository::new(tx),
        state.jwt.clone(),
        state.passwords,
    );
    let pair = service
        .login(payload.entreprise_id, &payload.login, &payload.password)
        .await?;
    Ok(Json(TokenResponse::bearer(pair)))
}

/// POST /auth/refresh — rotation du couple access/refresh.
pub async fn refresh(
    State(state): State<AppState>,
    DbTx(tx): DbTx,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_payload(&payload)?;
    let service = AuthService::new(
        PgUtilisateurRepository::new(tx),
        state.jwt.clone(),
        state.passwords,
    );
    let pair = service.refresh(&payload.refresh_token).await?;
    Ok(Json(TokenResponse::bearer(pair)))
}
