//! Authentication-related error types.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No session, or a session without a resolved identity.
    NotAuthenticated,

    /// The backend rejected the submitted credentials.
    LoginRejected { message: String },

    /// The login response carried no token.
    MissingToken,

    /// The backend refused to validate a stored token.
    SessionRejected { status: u16 },

    /// The token could not be written to the secure store, so sign-in did
    /// not happen.
    PersistFailed { message: String },

    /// Account creation refused, with the server's reason.
    SignupRejected { message: String },
}

impl AuthError {
    /// Whether the user has to sign in again to get past this error.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::SessionRejected { .. }
        )
    }

    /// User-facing message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => "You need to sign in first.".to_string(),
            AuthError::LoginRejected { message } => {
                if message.is_empty() {
                    "Sign-in failed for an unknown reason.".to_string()
                } else {
                    message.clone()
                }
            }
            AuthError::MissingToken => {
                "Sign-in succeeded but the server did not return a session.".to_string()
            }
            AuthError::SessionRejected { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthError::PersistFailed { .. } => {
                "Your session could not be saved to the system keychain.".to_string()
            }
            AuthError::SignupRejected { message } => {
                if message.is_empty() {
                    "Sign-up failed.".to_string()
                } else {
                    message.clone()
                }
            }
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::LoginRejected { .. } => "E_AUTH_LOGIN",
            AuthError::MissingToken => "E_AUTH_NO_TOKEN",
            AuthError::SessionRejected { .. } => "E_AUTH_REJECTED",
            AuthError::PersistFailed { .. } => "E_AUTH_PERSIST",
            AuthError::SignupRejected { .. } => "E_AUTH_SIGNUP",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::LoginRejected { message } => write!(f, "Login rejected: {}", message),
            AuthError::MissingToken => write!(f, "Login response did not contain a token"),
            AuthError::SessionRejected { status } => {
                write!(f, "Session validation rejected (HTTP {})", status)
            }
            AuthError::PersistFailed { message } => {
                write!(f, "Failed to persist session token: {}", message)
            }
            AuthError::SignupRejected { message } => write!(f, "Sign-up rejected: {}", message),
        }
    }
}

impl std::error::Error for AuthError {}
