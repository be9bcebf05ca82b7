//! Account record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted account.
///
/// Only the password hash is ever stored; the plaintext never reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Stamp an identifier and timestamps onto the new account.
    pub(crate) fn into_account(self) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::generate(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
