//! Client configuration.

use std::time::Duration;
use tracing::warn;

/// Backend used when `MOODLOG_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:7078";

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "MOODLOG_API_URL";

/// Environment variable overriding the request timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "MOODLOG_TIMEOUT_SECS";

/// Configuration shared by the session, the APIs, and the screens.
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```ignore
/// use moodlog::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://diary.example.com")
///     .with_page_size(20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash
    pub base_url: String,
    /// Per-request timeout (default: 30s)
    pub request_timeout: Duration,
    /// Quiet period before a uniqueness check fires (default: 300ms)
    pub debounce_delay: Duration,
    /// Diary list page size (default: 10)
    pub page_size: usize,
    /// Keychain service name for the session token
    pub keychain_service: String,
    /// Keychain account name for the session token
    pub keychain_account: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            debounce_delay: Duration::from_millis(300),
            page_size: 10,
            keychain_service: "moodlog".to_string(),
            keychain_account: "authToken".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the page size. Zero is raised to one.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn with_keychain(mut self, service: impl Into<String>, account: impl Into<String>) -> Self {
        self.keychain_service = service.into();
        self.keychain_account = account.into();
        self
    }

    /// Defaults overridden by `MOODLOG_API_URL` and `MOODLOG_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through
    /// `lookup`. Unusable values are skipped with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config = config.with_base_url(url);
            } else {
                warn!(var = API_URL_ENV, value = url, "Ignoring non-HTTP API URL");
            }
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config = config.with_request_timeout(Duration::from_secs(secs));
                }
                _ => warn!(var = TIMEOUT_ENV, value = %raw, "Ignoring invalid timeout"),
            }
        }

        config
    }
}
