//! Unified error type for the moodlog client.
//!
//! Every fallible operation that reaches a screen boundary returns a
//! [`MoodlogError`], which knows its category and how to phrase itself for
//! the user.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use crate::auth::token::TokenDecodeError;
use crate::domain::validation::ValidationError;
use crate::models::analysis::AnalysisFormatError;
use crate::traits::{HttpError, TokenStoreError};

/// Unified error type.
#[derive(Debug)]
pub enum MoodlogError {
    /// Transport failures and non-2xx responses.
    Network(NetworkError),

    /// Session and login failures.
    Auth(AuthError),

    /// Secure credential store failures.
    Storage(TokenStoreError),

    /// Session token could not be decoded locally.
    Decode(TokenDecodeError),

    /// Analysis response matched neither known shape.
    AnalysisFormat(AnalysisFormatError),

    /// User input rejected before any request was made.
    Validation(ValidationError),
}

impl MoodlogError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MoodlogError::Network(err) => {
                if err.is_server_side() {
                    ErrorCategory::Server
                } else if let NetworkError::HttpStatus { status: 401, .. } = err {
                    ErrorCategory::Auth
                } else if let NetworkError::HttpStatus { .. } | NetworkError::NotFound { .. } =
                    err
                {
                    ErrorCategory::User
                } else {
                    ErrorCategory::Network
                }
            }
            MoodlogError::Auth(err) => {
                if err.requires_reauth() {
                    ErrorCategory::Auth
                } else if let AuthError::PersistFailed { .. } = err {
                    ErrorCategory::System
                } else {
                    ErrorCategory::User
                }
            }
            MoodlogError::Storage(_) => ErrorCategory::System,
            MoodlogError::Decode(_) => ErrorCategory::Client,
            MoodlogError::AnalysisFormat(_) => ErrorCategory::Server,
            MoodlogError::Validation(_) => ErrorCategory::User,
        }
    }

    /// User-facing message.
    pub fn user_message(&self) -> String {
        match self {
            MoodlogError::Network(err) => err.user_message(),
            MoodlogError::Auth(err) => err.user_message(),
            MoodlogError::Storage(_) => "The system keychain could not be accessed.".to_string(),
            MoodlogError::Decode(_) => {
                "Your session could not be read. Please sign in again.".to_string()
            }
            MoodlogError::AnalysisFormat(_) => "Unknown response format.".to_string(),
            MoodlogError::Validation(err) => err.to_string(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            MoodlogError::Network(err) => err.error_code(),
            MoodlogError::Auth(err) => err.error_code(),
            MoodlogError::Storage(_) => "E_STORE",
            MoodlogError::Decode(_) => "E_TOKEN_DECODE",
            MoodlogError::AnalysisFormat(_) => "E_ANALYSIS_FORMAT",
            MoodlogError::Validation(_) => "E_VALIDATION",
        }
    }

    /// Hint shown below the message.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Whether the caller should send the user back to the sign-in flow.
    pub fn requires_reauth(&self) -> bool {
        match self {
            MoodlogError::Auth(err) => err.requires_reauth(),
            MoodlogError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            MoodlogError::Decode(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MoodlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodlogError::Network(err) => write!(f, "{}", err),
            MoodlogError::Auth(err) => write!(f, "{}", err),
            MoodlogError::Storage(err) => write!(f, "{}", err),
            MoodlogError::Decode(err) => write!(f, "{}", err),
            MoodlogError::AnalysisFormat(err) => write!(f, "{}", err),
            MoodlogError::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MoodlogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoodlogError::Network(err) => Some(err),
            MoodlogError::Auth(err) => Some(err),
            MoodlogError::Storage(err) => Some(err),
            MoodlogError::Decode(err) => Some(err),
            MoodlogError::AnalysisFormat(err) => Some(err),
            MoodlogError::Validation(err) => Some(err),
        }
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<NetworkError> for MoodlogError {
    fn from(err: NetworkError) -> Self {
        MoodlogError::Network(err)
    }
}

impl From<HttpError> for MoodlogError {
    fn from(err: HttpError) -> Self {
        MoodlogError::Network(err.into())
    }
}

impl From<AuthError> for MoodlogError {
    fn from(err: AuthError) -> Self {
        MoodlogError::Auth(err)
    }
}

impl From<TokenStoreError> for MoodlogError {
    fn from(err: TokenStoreError) -> Self {
        MoodlogError::Storage(err)
    }
}

impl From<TokenDecodeError> for MoodlogError {
    fn from(err: TokenDecodeError) -> Self {
        MoodlogError::Decode(err)
    }
}

impl From<AnalysisFormatError> for MoodlogError {
    fn from(err: AnalysisFormatError) -> Self {
        MoodlogError::AnalysisFormat(err)
    }
}

impl From<ValidationError> for MoodlogError {
    fn from(err: ValidationError) -> Self {
        MoodlogError::Validation(err)
    }
}

impl From<serde_json::Error> for MoodlogError {
    fn from(err: serde_json::Error) -> Self {
        MoodlogError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
