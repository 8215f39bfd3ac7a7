//! Password hashing with bcrypt
//!
//! The cost factor comes from configuration (`BCRYPT_ROUNDS`, 4..=18). The
//! produced hash is self-describing (salt and cost embedded), so `verify`
//! only needs the stored string.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    Hash(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    rounds: u32,
}

impl PasswordService {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.rounds).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Constant-time check of a cleartext candidate against a stored hash.
    /// A malformed stored hash verifies as false instead of erroring.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
