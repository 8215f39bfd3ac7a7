//! JWT token handling
//!
//! Access and refresh tokens are self-contained HS256 JWTs carrying the user
//! id (`sub`, serialised as a string), the entreprise id (`ent`) and the
//! token kind. Verification is strict: no clock leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    Creation(String),
    #[error("Invalid or expired token")]
    Invalid,
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub ent: i64,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

impl Claims {
    /// Subject id parsed back to an integer. A non-integer `sub` is treated
    /// as an invalid token.
    pub fn subject_id(&self) -> Result<i64, JwtError> {
        self.sub.parse::<i64>().map_err(|_| JwtError::Invalid)
    }
}

pub struct JwtCodec {
    secret: String,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtCodec {
    pub fn new(
        secret: String,
        algorithm: &str,
        access_expire_minutes: i64,
        refresh_expire_days: i64,
    ) -> Result<Self, JwtError> {
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(JwtError::UnsupportedAlgorithm(other.to_string())),
        };
        Ok(Self {
            secret,
            algorithm,
            access_ttl: Duration::minutes(access_expire_minutes),
            refresh_ttl: Duration::days(refresh_expire_days),
        })
    }

    pub fn mint_access(&self, subject_id: i64, entreprise_id: i64) -> Result<String, JwtError> {
        self.mint(subject_id, entreprise_id, TokenKind::Access, self.access_ttl)
    }

    pub fn mint_refresh(&self, subject_id: i64, entreprise_id: i64) -> Result<String, JwtError> {
        self.mint(subject_id, entreprise_id, TokenKind::Refresh, self.refresh_ttl)
    }

    pub fn mint(
        &self,
        subject_id: i64,
        entreprise_id: i64,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            ent: entreprise_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };
        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::Creation(e.to_string()))
    }

    /// Validates signature and expiry, rejects a mismatched kind and a
    /// non-integer subject.
    pub fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| JwtError::Invalid)?;
        let claims = data.claims;
        if claims.kind != expected_kind {
            return Err(JwtError::Invalid);
        }
        claims.subject_id()?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> JwtCodec {
        JwtCodec::new(
            "test-secret-key-of-sufficient-length".to_string(),
            "HS256",
            60,
            7,
        )
        .unwrap()
    }

    #[test]
    fn mint_verify_round_trip() {
        let codec = codec();
        let token = codec.mint_access(42, 7).unwrap();
        let claims = codec.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 42);
        assert_eq!(claims.ent, 7);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let token = codec
            .mint(1, 1, TokenKind::Access, Duration::seconds(-1))
            .unwrap();
        assert!(matches!(
            codec.verify(&token, TokenKind::Access),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let codec = codec();
        let access = codec.mint_access(1, 1).unwrap();
        let refresh = codec.mint_refresh(1, 1).unwrap();
        assert!(codec.verify(&access, TokenKind::Refresh).is_err());
        assert!(codec.verify(&refresh, TokenKind::Access).is_err());
        assert!(codec.verify(&access, TokenKind::Access).is_ok());
        assert!(codec.verify(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = codec();
        let other = JwtCodec::new(
            "another-secret-key-of-sufficient-len".to_string(),
            "HS256",
            60,
            7,
        )
        .unwrap();
        let token = codec.mint_access(1, 1).unwrap();
        assert!(other.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn non_integer_subject_is_rejected() {
        let secret = "test-secret-key-of-sufficient-length";
        let now = Utc::now();
        let claims = Claims {
            sub: "admin".to_string(),
            ent: 1,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            kind: TokenKind::Access,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        let codec = codec();
        assert!(matches!(
            codec.verify(&token, TokenKind::Access),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let codec = codec();
        assert!(codec.verify("not-a-jwt", TokenKind::Access).is_err());
        assert!(codec.verify("", TokenKind::Access).is_err());
    }

    #[test]
    fn unknown_algorithm_is_refused() {
        assert!(matches!(
            JwtCodec::new("x".repeat(32), "RS256", 60, 7),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }
}
