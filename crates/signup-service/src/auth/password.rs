//! bcrypt password hashing.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Cost factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// One-way password hasher.
///
/// Every call draws a fresh salt, which bcrypt embeds in the returned hash
/// string together with the cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::Hashing(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    ///
    /// Runs on the blocking pool; bcrypt at cost 10 takes tens of milliseconds.
    pub async fn hash(&self, password: &SecretString) -> Result<String, AuthError> {
        let cost = self.cost;
        let password = password.clone();

        tokio::task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), cost))
            .await
            .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    /// Check a plaintext password against a stored hash.
    pub async fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, AuthError> {
        let password = password.clone();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &hash))
            .await
            .map_err(|e| AuthError::Hashing(format!("verification task failed: {}", e)))?
            .map_err(AuthError::from)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
