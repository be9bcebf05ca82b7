//! Storage trait and backend selection.

use crate::error::StoreError;
use crate::file::FileAccountStore;
use crate::memory::MemoryAccountStore;
use crate::types::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

/// Storage collaborator used by the signup workflow.
///
/// Implementations must reject an `insert` whose email is already present with
/// [`StoreError::Duplicate`], atomically with respect to other inserts.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Create an account, assigning its id and timestamps.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Delete an account. Returns `false` if no account had this id.
    async fn remove(&self, id: &AccountId) -> Result<bool, StoreError>;

    /// Number of stored accounts.
    async fn count(&self) -> usize;

    /// Whether the backend can currently serve requests.
    async fn health_check(&self) -> bool;
}

/// Storage backend that works with or without persistence.
pub enum Store {
    /// JSON snapshot on disk
    File(FileAccountStore),
    /// In-memory only (no persistence)
    Memory(MemoryAccountStore),
}

impl Store {
    /// Open a file-backed store, or an in-memory one when `persist` is false.
    pub async fn open(persist: bool, storage_path: PathBuf) -> Result<Self, StoreError> {
        if persist {
            info!("Using file-backed account storage at {:?}", storage_path);
            Ok(Store::File(FileAccountStore::open(storage_path).await?))
        } else {
            warn!("Persistence disabled, using in-memory storage (accounts will be lost on restart)");
            Ok(Store::memory())
        }
    }

    /// Force memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryAccountStore::new())
    }

    fn backend(&self) -> &dyn AccountStore {
        match self {
            Store::File(s) => s,
            Store::Memory(s) => s,
        }
    }
}

#[async_trait]
impl AccountStore for Store {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.backend().find_by_email(email).await
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.backend().insert(account).await
    }

    async fn remove(&self, id: &AccountId) -> Result<bool, StoreError> {
        self.backend().remove(id).await
    }

    async fn count(&self) -> usize {
        self.backend().count().await
    }

    async fn health_check(&self) -> bool {
        self.backend().health_check().await
    }
}
