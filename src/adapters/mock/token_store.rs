//! In-memory token store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{TokenStore, TokenStoreError};

/// In-memory token store with switchable failures.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryTokenStore::new();
/// store.save("token").await?;
/// assert_eq!(store.load().await?, Some("token".to_string()));
/// store.clear().await?;
/// assert!(store.load().await?.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.token.lock().unwrap() = Some(token.to_string());
        store
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether clear should fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *self.clear_should_fail.lock().unwrap() = should_fail;
    }

    /// Current token, read synchronously for assertions.
    pub fn stored_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(TokenStoreError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.token.lock().unwrap().clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(TokenStoreError::SaveFailed("Mock save failure".to_string()));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        if *self.clear_should_fail.lock().unwrap() {
            return Err(TokenStoreError::ClearFailed("Mock clear failure".to_string()));
        }
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
