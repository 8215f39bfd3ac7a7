//! Domain errors
//!
//! Small closed taxonomy; the API layer maps each kind to one HTTP status
//! and the `{"detail", "code"}` envelope. `Database` and `Internal` are
//! never shown to clients.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenCode {
    Generic,
    Entreprise,
    Permission,
    Licence,
}

impl ForbiddenCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForbiddenCode::Generic => "FORBIDDEN",
            ForbiddenCode::Entreprise => "FORBIDDEN_ENTREPRISE",
            ForbiddenCode::Permission => "FORBIDDEN_PERMISSION",
            ForbiddenCode::Licence => "FORBIDDEN_LICENCE",
        }
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{detail}")]
    Forbidden { detail: String, code: ForbiddenCode },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        DomainError::BadRequest(detail.into())
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        DomainError::Unauthorized(detail.into())
    }

    pub fn forbidden(detail: impl Into<String>, code: ForbiddenCode) -> Self {
        DomainError::Forbidden {
            detail: detail.into(),
            code,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        DomainError::NotFound(detail.into())
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        DomainError::Conflict(detail.into())
    }
}
