//! In-memory account table and store.

use crate::error::StoreError;
use crate::store::AccountStore;
use crate::types::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Accounts indexed by email.
///
/// Emails are used as keys exactly as given, so uniqueness is case-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountTable {
    accounts: HashMap<String, Account>,
}

impl AccountTable {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Get an account by email.
    pub fn get(&self, email: &str) -> Option<&Account> {
        self.accounts.get(email)
    }

    /// Insert a new account, rejecting an email that is already taken.
    pub fn insert_unique(&mut self, new: NewAccount) -> Result<Account, StoreError> {
        if self.accounts.contains_key(&new.email) {
            return Err(StoreError::Duplicate(new.email));
        }

        let account = new.into_account();
        self.accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }

    /// Remove an account by id. Returns the removed record, if any.
    pub fn remove_by_id(&mut self, id: &AccountId) -> Option<Account> {
        let email = self
            .accounts
            .values()
            .find(|a| &a.id == id)
            .map(|a| a.email.clone())?;
        self.accounts.remove(&email)
    }

    /// Put back a previously removed account unchanged.
    pub(crate) fn restore(&mut self, account: Account) {
        self.accounts.insert(account.email.clone(), account);
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }
}

/// Account store kept entirely in process memory.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    table: Arc<RwLock<AccountTable>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let table = self.table.read().await;
        Ok(table.get(email).cloned())
    }

    #[instrument(skip_all)]
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut table = self.table.write().await;
        let account = table.insert_unique(account)?;
        debug!(account_id = %account.id, "Account inserted (total: {})", table.count());
        Ok(account)
    }

    async fn remove(&self, id: &AccountId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        Ok(table.remove_by_id(id).is_some())
    }

    async fn count(&self) -> usize {
        self.table.read().await.count()
    }

    async fn health_check(&self) -> bool {
        true
    }
}
