//! Signed identity tokens (HS256 JWT).

use crate::error::AuthError;
use account_store::AccountId;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a configured expiry value is interpreted.
///
/// The historical value `3600000` reads as one hour in milliseconds but about
/// 41.7 days in seconds, so the unit is always configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryUnit {
    Seconds,
    Milliseconds,
}

/// Token validity window measured from issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenExpiry {
    pub value: u64,
    pub unit: ExpiryUnit,
}

impl TokenExpiry {
    pub fn new(value: u64, unit: ExpiryUnit) -> Self {
        Self { value, unit }
    }

    pub fn duration(&self) -> Duration {
        match self.unit {
            ExpiryUnit::Seconds => Duration::from_secs(self.value),
            ExpiryUnit::Milliseconds => Duration::from_millis(self.value),
        }
    }

    /// Lifetime in whole seconds, rounded up so a sub-second remainder still
    /// lands after `iat`.
    pub fn whole_secs(&self) -> u64 {
        match self.unit {
            ExpiryUnit::Seconds => self.value,
            ExpiryUnit::Milliseconds => self.value.div_ceil(1000),
        }
    }
}

/// Claims carried by an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account display name
    pub name: String,
    /// Account identifier
    pub id: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

/// Issues and verifies identity tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: TokenExpiry,
}

impl TokenIssuer {
    /// Create an issuer. An empty secret or a zero lifetime is rejected.
    pub fn new(secret: &SecretString, expiry: TokenExpiry) -> Result<Self, AuthError> {
        let secret = secret.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::Signing("signing secret is not configured".into()));
        }
        if expiry.value == 0 {
            return Err(AuthError::Signing("token lifetime must be positive".into()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        })
    }

    pub fn expiry(&self) -> TokenExpiry {
        self.expiry
    }

    /// Sign a token for the given account.
    pub fn issue(&self, name: &str, id: &AccountId) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let lifetime = i64::try_from(self.expiry.whole_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            name: name.to_string(),
            id: id.to_string(),
            iat,
            exp: iat.saturating_add(lifetime),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// An issuer whose key cannot sign HS256, so every `issue` fails.
    #[cfg(test)]
    pub(crate) fn with_unusable_key(expiry: TokenExpiry) -> Self {
        Self {
            encoding: EncodingKey::from_ec_der(&[]),
            decoding: DecodingKey::from_secret(b"unused"),
            expiry,
        }
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
