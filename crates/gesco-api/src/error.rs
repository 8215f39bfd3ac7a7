//! Enveloppe d'erreur HTTP
//!
//! Toutes les erreurs sortent sous la forme `{"detail": ..., "code": ...}`.
//! Les erreurs internes ne montrent jamais leur cause au client : libellé
//! fixe, détail réel loggé côté serveur.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;
use validator::Validate;

use gesco_core::error::DomainError;
use gesco_core::messages;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
    pub code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail, "BAD_REQUEST")
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail, "UNAUTHORIZED")
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            messages::ERREUR_INTERNE,
            "INTERNAL_ERROR",
        )
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BadRequest(detail) => Self::bad_request(detail),
            DomainError::Unauthorized(detail) => Self::unauthorized(detail),
            DomainError::Forbidden { detail, code } => {
                Self::new(StatusCode::FORBIDDEN, detail, code.as_str())
            }
            DomainError::NotFound(detail) => {
                Self::new(StatusCode::NOT_FOUND, detail, "NOT_FOUND")
            }
            DomainError::Conflict(detail) => Self::new(StatusCode::CONFLICT, detail, "CONFLICT"),
            DomainError::Database(detail) | DomainError::Internal(detail) => {
                error!("internal error: {detail}");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "detail": self.detail,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Validation d'un payload au seuil du handler ; échec → 400.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))
}
