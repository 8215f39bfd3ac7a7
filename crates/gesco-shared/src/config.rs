//! Configuration management
//!
//! Every value is read from the environment (or a `.env` file loaded by the
//! binary). Variable names are flat and uppercase: `SECRET_KEY`,
//! `DATABASE_URL`, `ACCESS_TOKEN_EXPIRE_MINUTES`, ...

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    // Application
    pub app_name: String,
    pub app_env: String,
    pub host: String,
    pub port: u16,
    pub api_v1_prefix: String,

    // Database
    pub database_url: String,
    pub database_pool_size: u32,
    pub database_max_overflow: u32,

    // Security & JWT
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub bcrypt_rounds: u32,
    pub rate_limit_per_minute: u32,
    /// Roles without any configured grant pass the permission gate when true.
    /// Legacy behaviour; new deployments should seed grants and flip this off.
    pub permissions_default_open: bool,

    // CORS
    pub cors_origins: String,
    pub cors_allow_credentials: bool,

    // Logging
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("app_name", "Gesco")?
            .set_default("app_env", "development")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("api_v1_prefix", "/api/v1")?
            .set_default("database_pool_size", 5)?
            .set_default("database_max_overflow", 10)?
            .set_default("algorithm", "HS256")?
            .set_default("access_token_expire_minutes", 60)?
            .set_default("refresh_token_expire_days", 7)?
            .set_default("bcrypt_rounds", 12)?
            .set_default("rate_limit_per_minute", 60)?
            .set_default("permissions_default_open", true)?
            .set_default("cors_origins", "*")?
            .set_default("cors_allow_credentials", true)?
            .set_default("log_level", "INFO")?
            .set_default("log_format", "json")?
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.len() < 32 {
            return Err(ConfigError::Message(
                "SECRET_KEY must be at least 32 characters".into(),
            ));
        }
        if !(4..=18).contains(&self.bcrypt_rounds) {
            return Err(ConfigError::Message(
                "BCRYPT_ROUNDS must be between 4 and 18".into(),
            ));
        }
        Ok(())
    }

    /// CORS origins as a list; `*` (or empty) allows every origin.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let raw = self.cors_origins.trim();
        if raw.is_empty() || raw == "*" {
            return vec!["*".to_string()];
        }
        raw.split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Settings {
        Settings {
            app_name: "Gesco".into(),
            app_env: "test".into(),
            host: "127.0.0.1".into(),
            port: 8000,
            api_v1_prefix: "/api/v1".into(),
            database_url: "postgres://localhost/gesco".into(),
            database_pool_size: 5,
            database_max_overflow: 10,
            secret_key: "0123456789abcdef0123456789abcdef".into(),
            algorithm: "HS256".into(),
            access_token_expire_minutes: 60,
            refresh_token_expire_days: 7,
            bcrypt_rounds: 4,
            rate_limit_per_minute: 0,
            permissions_default_open: true,
            cors_origins: "*".into(),
            cors_allow_credentials: true,
            log_level: "INFO".into(),
            log_format: "text".into(),
            log_file: None,
        }
    }

    #[test]
    fn secret_key_too_short_is_rejected() {
        let mut s = base();
        s.secret_key = "short".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn bcrypt_rounds_out_of_range_is_rejected() {
        let mut s = base();
        s.bcrypt_rounds = 3;
        assert!(s.validate().is_err());
        s.bcrypt_rounds = 19;
        assert!(s.validate().is_err());
        s.bcrypt_rounds = 12;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn cors_origins_star_and_list() {
        let mut s = base();
        assert_eq!(s.cors_origins_list(), vec!["*".to_string()]);
        s.cors_origins = "http://localhost:3000, http://gesco.cm".into();
        assert_eq!(
            s.cors_origins_list(),
            vec![
                "http://localhost:3000".to_string(),
                "http://gesco.cm".to_string()
            ]
        );
    }
}
