//! Platform keychain token store.
//!
//! Stores the session token as a generic password under a fixed
//! service/account pair, using the OS credential facility (macOS Keychain,
//! Windows Credential Manager, Linux kernel keyring). Calls into the keychain
//! are blocking, so each runs on the blocking thread pool.

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use crate::traits::{TokenStore, TokenStoreError};

/// Token store backed by the platform keychain.
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service: String,
    account: String,
}

impl KeychainTokenStore {
    /// Create a store for the given service/account identifier.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    async fn with_entry<T, F>(
        &self,
        op: F,
        on_err: fn(String) -> TokenStoreError,
    ) -> Result<T, TokenStoreError>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        let account = self.account.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account).map_err(|e| classify(e, on_err))?;
            op(entry).map_err(|e| classify(e, on_err))
        })
        .await
        .map_err(|e| on_err(format!("keychain task failed: {}", e)))?
    }
}

fn classify(err: keyring::Error, on_err: fn(String) -> TokenStoreError) -> TokenStoreError {
    match err {
        keyring::Error::NoStorageAccess(inner) => TokenStoreError::Unavailable(inner.to_string()),
        other => on_err(other.to_string()),
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        self.with_entry(
            |entry| match entry.get_password() {
                Ok(token) if token.is_empty() => Ok(None),
                Ok(token) => Ok(Some(token)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e),
            },
            TokenStoreError::LoadFailed,
        )
        .await
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let token = token.to_string();
        self.with_entry(
            move |entry| entry.set_password(&token),
            TokenStoreError::SaveFailed,
        )
        .await?;
        debug!(service = %self.service, "Session token written to keychain");
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.with_entry(
            |entry| match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(e),
            },
            TokenStoreError::ClearFailed,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        let store = KeychainTokenStore::new("moodlog", "authToken");
        assert_eq!(store.service(), "moodlog");
        assert_eq!(store.account(), "authToken");
    }

    #[test]
    fn test_classify_no_storage_access() {
        let err = keyring::Error::NoStorageAccess(Box::new(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "locked",
        )));
        assert!(matches!(
            classify(err, TokenStoreError::LoadFailed),
            TokenStoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_classify_other_uses_operation_variant() {
        let err = keyring::Error::TooLong("service".to_string(), 255);
        assert!(matches!(
            classify(err, TokenStoreError::SaveFailed),
            TokenStoreError::SaveFailed(_)
        ));
    }

    // Round-trips against the real keychain are left to manual testing; CI
    // machines rarely have an unlocked credential store.
}
