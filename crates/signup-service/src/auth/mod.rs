//! Account signup workflow.

mod password;
mod token;
mod validation;

pub use password::{PasswordHasher, DEFAULT_COST};
pub use token::{Claims, ExpiryUnit, TokenExpiry, TokenIssuer};
pub use validation::{validate_email, validate_name};

use crate::error::AuthError;
use account_store::{Account, AccountStore, NewAccount, StoreError};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Creates accounts and issues their first identity token.
pub struct SignupService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl SignupService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Register a new account and return a signed token for it.
    ///
    /// Fails with [`AuthError::Conflict`] if the email is already taken, whether
    /// that is seen by the lookup or by the store's own uniqueness check on insert.
    #[instrument(skip_all)]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<String, AuthError> {
        if self.store.find_by_email(email).await?.is_some() {
            warn!("Signup rejected: email already registered");
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hasher.hash(password).await?;

        let account = self
            .store
            .insert(NewAccount::new(name, email, password_hash))
            .await
            .inspect_err(|e| {
                if matches!(e, StoreError::Duplicate(_)) {
                    warn!("Signup rejected on insert: email registered concurrently");
                }
            })?;

        match self.tokens.issue(&account.name, &account.id) {
            Ok(token) => {
                info!(account_id = %account.id, "Account created");
                Ok(token)
            }
            Err(e) => {
                error!(account_id = %account.id, "Token issuance failed: {}", e);
                self.discard(&account).await;
                Err(e)
            }
        }
    }

    /// Remove an account whose signup could not be completed.
    async fn discard(&self, account: &Account) {
        match self.store.remove(&account.id).await {
            Ok(true) => info!(account_id = %account.id, "Discarded incomplete account"),
            Ok(false) => warn!(account_id = %account.id, "Incomplete account already gone"),
            Err(e) => error!(
                account_id = %account.id,
                "Failed to discard incomplete account: {}", e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_store::{AccountId, MemoryAccountStore, MockAccountStore};
    use chrono::Utc;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &secret("test-secret"),
            TokenExpiry::new(3_600_000, ExpiryUnit::Milliseconds),
        )
        .unwrap()
    }

    fn service(store: Arc<dyn AccountStore>) -> SignupService {
        SignupService::new(store, PasswordHasher::new(4).unwrap(), issuer())
    }

    fn stored_account(email: &str) -> Account {
        Account {
            id: AccountId::generate(),
            name: "Existing User".into(),
            email: email.into(),
            password_hash: "$2b$04$existing".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_account() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = service(store.clone());

        let token = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await
            .unwrap();
        assert!(!token.is_empty());

        let account = store.find_by_email("test@example.com").await.unwrap().unwrap();
        assert_eq!(account.name, "Test User");
        assert_ne!(account.password_hash, "password123");
        assert!(service
            .hasher()
            .verify(&secret("password123"), &account.password_hash)
            .await
            .unwrap());

        let claims = service.tokens().verify(&token).unwrap();
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.id, account.id.to_string());
    }

    #[tokio::test]
    async fn test_sign_up_conflict_on_existing_email() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = service(store.clone());

        service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await
            .unwrap();
        let original = store.find_by_email("test@example.com").await.unwrap().unwrap();

        let result = service
            .sign_up("Other User", "test@example.com", &secret("different"))
            .await;
        assert!(matches!(result, Err(AuthError::Conflict)));

        let after = store.find_by_email("test@example.com").await.unwrap().unwrap();
        assert_eq!(store.count().await, 1);
        assert_eq!(after.id, original.id);
        assert_eq!(after.name, "Test User");
        assert_eq!(after.password_hash, original.password_hash);
    }

    #[tokio::test]
    async fn test_existing_email_never_hashes_or_inserts() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(|email| Ok(Some(stored_account(email))));
        store.expect_insert().never();

        let service = service(Arc::new(store));
        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn test_duplicate_on_insert_is_conflict() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .times(1)
            .returning(|account| Err(StoreError::Duplicate(account.email)));

        let service = service(Arc::new(store));
        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_storage_unavailable() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Err(StoreError::Unavailable("connection refused".into())));
        store.expect_insert().never();

        let service = service(Arc::new(store));
        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_insert_failure_is_storage_unavailable() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store.expect_insert().returning(|_| {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )))
        });

        let service = service(Arc::new(store));
        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_insert_receives_hash_not_plaintext() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|account| {
                account.name == "Test User"
                    && account.email == "test@example.com"
                    && account.password_hash != "password123"
                    && account.password_hash.starts_with("$2b$04$")
            })
            .times(1)
            .returning(|account| {
                let mut stored = stored_account(&account.email);
                stored.name = account.name;
                stored.password_hash = account.password_hash;
                Ok(stored)
            });

        let service = service(Arc::new(store));
        let token = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await
            .unwrap();

        assert_eq!(service.tokens().verify(&token).unwrap().name, "Test User");
    }

    #[tokio::test]
    async fn test_signing_failure_discards_account() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = SignupService::new(
            store.clone(),
            PasswordHasher::new(4).unwrap(),
            TokenIssuer::with_unusable_key(TokenExpiry::new(3600, ExpiryUnit::Seconds)),
        );

        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::Signing(_))));
        assert_eq!(store.count().await, 0);
        assert!(store.find_by_email("test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signing_failure_removes_the_inserted_id() {
        let inserted = stored_account("test@example.com");
        let inserted_id = inserted.id;

        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .times(1)
            .returning(move |_| Ok(inserted.clone()));
        store
            .expect_remove()
            .withf(move |id| *id == inserted_id)
            .times(1)
            .returning(|_| Ok(true));

        let service = SignupService::new(
            Arc::new(store),
            PasswordHasher::new(4).unwrap(),
            TokenIssuer::with_unusable_key(TokenExpiry::new(3600, ExpiryUnit::Seconds)),
        );
        let result = service
            .sign_up("Test User", "test@example.com", &secret("password123"))
            .await;

        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[tokio::test]
    async fn test_discard_removes_account() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = service(store.clone());

        let account = store
            .insert(NewAccount::new("Test User", "test@example.com", "hash"))
            .await
            .unwrap();
        service.discard(&account).await;

        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_discard_tolerates_store_failure() {
        let mut store = MockAccountStore::new();
        store
            .expect_remove()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("down".into())));

        let service = service(Arc::new(store));
        service.discard(&stored_account("test@example.com")).await;
    }

    #[tokio::test]
    async fn test_same_password_distinct_accounts() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = service(store.clone());

        service
            .sign_up("User A", "a@example.com", &secret("shared-password"))
            .await
            .unwrap();
        service
            .sign_up("User B", "b@example.com", &secret("shared-password"))
            .await
            .unwrap();

        let a = store.find_by_email("a@example.com").await.unwrap().unwrap();
        let b = store.find_by_email("b@example.com").await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[tokio::test]
    async fn test_concurrent_signups_same_email() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = Arc::new(service(store.clone()));

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .sign_up(
                            &format!("User {i}"),
                            "race@example.com",
                            &SecretString::new("password123".into()),
                        )
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(AuthError::Conflict) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(store.count().await, 1);
    }
}
