//! Secure token store trait abstraction.
//!
//! The store holds exactly one secret: the session token. Production code
//! uses the platform keychain; tests use an in-memory double.

use async_trait::async_trait;

/// Token store operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenStoreError {
    /// Failed to read the token
    LoadFailed(String),
    /// Failed to write the token
    SaveFailed(String),
    /// Failed to delete the token
    ClearFailed(String),
    /// No secure storage backend on this platform or session
    Unavailable(String),
}

impl std::fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenStoreError::LoadFailed(msg) => write!(f, "Failed to load token: {}", msg),
            TokenStoreError::SaveFailed(msg) => write!(f, "Failed to save token: {}", msg),
            TokenStoreError::ClearFailed(msg) => write!(f, "Failed to clear token: {}", msg),
            TokenStoreError::Unavailable(msg) => {
                write!(f, "Secure storage unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for TokenStoreError {}

/// Trait for session token persistence.
///
/// # Example
///
/// ```ignore
/// use moodlog::traits::TokenStore;
///
/// async fn has_session<S: TokenStore>(store: &S) -> bool {
///     matches!(store.load().await, Ok(Some(_)))
/// }
/// ```
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token.
    ///
    /// # Returns
    /// - `Ok(Some(token))` if a token is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if the store could not be read
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_store_error_display() {
        assert_eq!(
            TokenStoreError::LoadFailed("locked".to_string()).to_string(),
            "Failed to load token: locked"
        );
        assert_eq!(
            TokenStoreError::SaveFailed("denied".to_string()).to_string(),
            "Failed to save token: denied"
        );
        assert_eq!(
            TokenStoreError::ClearFailed("denied".to_string()).to_string(),
            "Failed to clear token: denied"
        );
        assert_eq!(
            TokenStoreError::Unavailable("no backend".to_string()).to_string(),
            "Secure storage unavailable: no backend"
        );
    }

    #[test]
    fn test_token_store_error_implements_error_trait() {
        let err = TokenStoreError::Unavailable("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
