//! Application state

use std::sync::Arc;

use sqlx::PgPool;

use gesco_security::jwt::{JwtCodec, JwtError};
use gesco_security::password::PasswordService;
use gesco_shared::config::Settings;

use crate::middleware::rate_limit::{build_limiter, IpRateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub jwt: Arc<JwtCodec>,
    pub passwords: PasswordService,
    pub rate_limiter: Option<Arc<IpRateLimiter>>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Result<Self, JwtError> {
        let jwt = JwtCodec::new(
            settings.secret_key.clone(),
            &settings.algorithm,
            settings.access_token_expire_minutes,
            settings.refresh_token_expire_days,
        )?;
        let passwords = PasswordService::new(settings.bcrypt_rounds);
        let rate_limiter = build_limiter(settings.rate_limit_per_minute);
        Ok(Self {
            pool,
            settings: Arc::new(settings),
            jwt: Arc::new(jwt),
            passwords,
            rate_limiter,
        })
    }
}
