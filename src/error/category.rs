//! Error category classification.
//!
//! Categories drive how an error is presented: whether the user can simply
//! try again, needs to sign in, or has to correct their input.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout.
    Network,

    /// Missing or rejected session.
    Auth,

    /// Backend returned a 5xx or an unusable body.
    Server,

    /// Client-side decoding or programming errors.
    Client,

    /// The user has to change something (input, selection) before retrying.
    User,

    /// Platform facilities such as the secure credential store.
    System,
}

impl ErrorCategory {
    /// Whether the user can reasonably trigger the same action again.
    ///
    /// Nothing in the client retries on its own; this only shapes the hint
    /// shown next to the message.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Sign in again to continue",
            ErrorCategory::Server => "The server may be busy. Please try again later",
            ErrorCategory::Client => "This may be a bug. Please report it if it persists",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check that the system keychain is available",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
