//! JSON-file backed account store.

use crate::error::StoreError;
use crate::memory::AccountTable;
use crate::store::AccountStore;
use crate::types::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Account store that snapshots the whole table to a JSON file after each write.
///
/// The table is held in memory; the snapshot is rewritten under the write lock
/// so readers never observe an account that failed to persist.
pub struct FileAccountStore {
    table: RwLock<AccountTable>,
    storage_path: PathBuf,
}

impl FileAccountStore {
    /// Open the store at `storage_path`, loading any existing snapshot.
    ///
    /// A missing file yields an empty store.
    pub async fn open(storage_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_path = storage_path.into();
        let table = load_table(&storage_path).await?;

        Ok(Self {
            table: RwLock::new(table),
            storage_path,
        })
    }

    async fn save(&self, table: &AccountTable) -> Result<(), StoreError> {
        let data = serde_json::to_vec(table)?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file + rename
        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved account table ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }
}

async fn load_table(path: &Path) -> Result<AccountTable, StoreError> {
    if !fs::try_exists(path).await? {
        info!(
            "Account file not found at {:?}, starting with empty store",
            path
        );
        return Ok(AccountTable::new());
    }

    let data = fs::read(path).await?;
    if data.is_empty() {
        warn!("Account file {:?} is empty, starting with empty store", path);
        return Ok(AccountTable::new());
    }

    let table: AccountTable = serde_json::from_slice(&data)?;
    info!("Loaded {} accounts from {:?}", table.count(), path);
    Ok(table)
}

#[async_trait]
impl AccountStore for FileAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let table = self.table.read().await;
        Ok(table.get(email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut table = self.table.write().await;
        let account = table.insert_unique(account)?;

        if let Err(e) = self.save(&table).await {
            error!(account_id = %account.id, "Failed to persist account, rolling back: {}", e);
            table.remove_by_id(&account.id);
            return Err(e);
        }

        Ok(account)
    }

    async fn remove(&self, id: &AccountId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let Some(removed) = table.remove_by_id(id) else {
            return Ok(false);
        };

        if let Err(e) = self.save(&table).await {
            error!(account_id = %removed.id, "Failed to persist removal, restoring: {}", e);
            table.restore(removed);
            return Err(e);
        }

        Ok(true)
    }

    async fn count(&self) -> usize {
        self.table.read().await.count()
    }

    async fn health_check(&self) -> bool {
        match self.storage_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::try_exists(parent).await.unwrap_or(false)
            }
            _ => true,
        }
    }
}
