//! Session lifecycle.
//!
//! [`SessionManager`] is the only owner of the session token. It keeps the
//! secure store and the in-memory copy in step and publishes every
//! transition on a watch channel, which the navigation root reads to pick a
//! screen stack.
//!
//! Transitions:
//!
//! ```text
//! Loading --initialize--> Authenticated | Unauthenticated
//! any     --sign_in-----> Loading --> Authenticated
//! any     --sign_out----> Unauthenticated
//! ```
//!
//! Operations are serialized: a second `sign_in` waits until the first has
//! written the store, set the token, and resolved the identity.

use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use super::api::AuthApi;
use super::token::{decode_claims_as, TokenClaims};
use crate::error::{AuthError, MoodlogResult};
use crate::models::User;
use crate::traits::TokenStore;

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Resolving the stored session, or signing in.
    #[default]
    Loading,
    /// No token.
    Unauthenticated,
    /// A token is held. `identity` is `None` when neither `/auth/me` nor the
    /// token claims could name the user.
    Authenticated { identity: Option<User> },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { identity } => identity.as_ref(),
            _ => None,
        }
    }
}

/// Owns the session token and user identity.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    api: AuthApi,
    token: RwLock<Option<String>>,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Loading` state.
    pub fn new(store: Arc<dyn TokenStore>, api: AuthApi) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            store,
            api,
            token: RwLock::new(None),
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current token, if any.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Resolved identity, if any.
    pub fn identity(&self) -> Option<User> {
        self.state.borrow().identity().cloned()
    }

    /// Identity or [`AuthError::NotAuthenticated`].
    ///
    /// Screens call this before any request that needs a user id.
    pub fn require_identity(&self) -> Result<User, AuthError> {
        self.identity().ok_or(AuthError::NotAuthenticated)
    }

    /// Restore the persisted session.
    ///
    /// Never fails: a missing token, an unreadable store, or a token the
    /// backend will not vouch for all end in `Unauthenticated`. A rejected
    /// token is purged from the store. Always leaves `Loading`.
    pub async fn initialize(&self) -> SessionState {
        let _guard = self.op_lock.lock().await;
        self.publish(SessionState::Loading);

        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session");
                return self.clear_in_memory().await;
            }
            Err(e) => {
                warn!(error = %e, "Could not read stored session");
                return self.clear_in_memory().await;
            }
        };

        match self.api.fetch_identity(&token).await {
            Ok(user) => {
                info!(user_id = %user.id, "Restored session");
                *self.token.write().await = Some(token);
                let state = SessionState::Authenticated {
                    identity: Some(user),
                };
                self.publish(state.clone());
                state
            }
            Err(e) => {
                warn!(code = e.error_code(), "Stored session failed validation: {}", e);
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Could not purge rejected session");
                }
                self.clear_in_memory().await
            }
        }
    }

    /// Adopt `token` as the session.
    ///
    /// The token is written to the store before it is used. If that write
    /// fails nothing changes and [`AuthError::PersistFailed`] is returned.
    /// Identity comes from `/auth/me`, falling back to the token claims; if
    /// both fail the session is `Authenticated` with no identity.
    pub async fn sign_in(&self, token: &str) -> MoodlogResult<()> {
        let _guard = self.op_lock.lock().await;
        let previous = self.state();
        self.publish(SessionState::Loading);

        if let Err(e) = self.store.save(token).await {
            warn!(error = %e, "Could not persist session");
            self.publish(previous);
            return Err(AuthError::PersistFailed {
                message: e.to_string(),
            }
            .into());
        }

        *self.token.write().await = Some(token.to_string());

        let identity = self.resolve_identity(token).await;
        match &identity {
            Some(user) => info!(user_id = %user.id, "Signed in"),
            None => warn!("Signed in without a resolved identity"),
        }
        self.publish(SessionState::Authenticated { identity });
        Ok(())
    }

    /// End the session.
    ///
    /// A store failure is logged; the in-memory session is cleared anyway.
    pub async fn sign_out(&self) {
        let _guard = self.op_lock.lock().await;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Could not clear stored session");
        }
        self.clear_in_memory().await;
        info!("Signed out");
    }

    async fn resolve_identity(&self, token: &str) -> Option<User> {
        match self.api.fetch_identity(token).await {
            Ok(user) => return Some(user),
            Err(e) => debug!(code = e.error_code(), "Identity lookup failed, reading claims"),
        }
        match decode_claims_as::<TokenClaims>(token) {
            Ok(claims) => Some(User::from_claims(&claims)),
            Err(e) => {
                warn!(error = %e, "Token claims unreadable");
                None
            }
        }
    }

    async fn clear_in_memory(&self) -> SessionState {
        *self.token.write().await = None;
        self.publish(SessionState::Unauthenticated);
        SessionState::Unauthenticated
    }

    fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
