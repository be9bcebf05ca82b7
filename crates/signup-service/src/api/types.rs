//! API request and response types.

use crate::auth::{validate_email, validate_name};
use crate::error::AuthError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Display name (non-empty)
    pub name: String,

    /// Email address, unique across accounts
    pub email: String,

    /// Plaintext password; only its hash is stored
    pub password: SecretString,
}

impl SignupRequest {
    /// Check the request's syntactic constraints.
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        Ok(())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub account_count: usize,
    pub storage_healthy: bool,
}
