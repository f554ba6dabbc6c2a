//! Network-related error types.
//!
//! Covers transport failures, non-2xx statuses carrying a server message, and
//! bodies that could not be parsed into the expected shape.

use std::fmt;

use crate::traits::{HttpError, Response};

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { operation: String },

    /// Non-2xx response. `message` is the server's own `message` field when
    /// the body carried one.
    HttpStatus { status: u16, message: String },

    /// The requested resource does not exist (HTTP 404).
    NotFound { resource: String },

    /// Body could not be read or did not have the expected shape.
    InvalidResponse { message: String },

    /// Anything else reported by the transport.
    Other { message: String },
}

impl NetworkError {
    /// User-facing message.
    ///
    /// For status errors the server's message wins, since the backend already
    /// phrases those for end users.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { operation } => {
                format!("The {} request timed out. Please try again.", operation)
            }
            NetworkError::HttpStatus { status, message } => {
                if !message.is_empty() {
                    return message.clone();
                }
                match *status {
                    400 => "The request was invalid. Please try again.".to_string(),
                    401 => "Your session has expired. Please sign in again.".to_string(),
                    403 => "You don't have permission for this action.".to_string(),
                    500..=599 => {
                        "The server is experiencing issues. Please try again later.".to_string()
                    }
                    _ => format!("The server returned an error (HTTP {}).", status),
                }
            }
            NetworkError::NotFound { resource } => format!("The {} could not be found.", resource),
            NetworkError::InvalidResponse { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::NotFound { .. } => "E_NET_NOT_FOUND",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }

    /// Error for a non-2xx `response` to a request about `resource`.
    ///
    /// 404 becomes [`NetworkError::NotFound`]; anything else keeps the status
    /// and the server's `message`, if the body had one.
    pub fn from_status(resource: &str, response: &Response) -> Self {
        if response.status == 404 {
            return NetworkError::NotFound {
                resource: resource.to_string(),
            };
        }
        NetworkError::HttpStatus {
            status: response.status,
            message: response.error_message().unwrap_or_default(),
        }
    }

    /// Whether this is a server-side failure rather than a transport one.
    pub fn is_server_side(&self) -> bool {
        match self {
            NetworkError::HttpStatus { status, .. } => *status >= 500,
            NetworkError::InvalidResponse { .. } => true,
            _ => false,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation } => write!(f, "{} timed out", operation),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::NotFound { resource } => write!(f, "{} not found", resource),
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed { url, message } => {
                NetworkError::ConnectionFailed { url, message }
            }
            HttpError::Timeout(operation) => NetworkError::Timeout { operation },
            HttpError::InvalidUrl(message) => NetworkError::Other {
                message: format!("invalid URL: {}", message),
            },
            HttpError::Body(message) => NetworkError::InvalidResponse { message },
            HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}
