//! Authenticated request wrapper.
//!
//! Every screen talks to the backend through [`AuthenticatedFetch`]. It adds
//! `Authorization: Bearer <token>` from the session and otherwise passes the
//! request through untouched. Status codes and bodies are the caller's
//! business.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::session::SessionManager;
use crate::traits::{HttpClient, HttpError, RequestOptions, Response};

#[derive(Clone)]
pub struct AuthenticatedFetch {
    http: Arc<dyn HttpClient>,
    base_url: String,
    session: Arc<SessionManager>,
}

impl AuthenticatedFetch {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Absolute URL for `path`. Absolute inputs are returned as-is.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send `options` to `path` with the session's bearer token.
    ///
    /// Without a token the request goes out with no Authorization header;
    /// callers that need a user check identity first.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Response, HttpError> {
        let url = self.url_for(path);
        let options = match self.session.token().await {
            Some(token) => options.header("Authorization", format!("Bearer {}", token)),
            None => {
                debug!(%url, "No session token, sending unauthenticated request");
                options
            }
        };
        self.http.request(&url, &options).await
    }

    pub async fn get(&self, path: &str) -> Result<Response, HttpError> {
        self.request(path, RequestOptions::get()).await
    }
}

impl fmt::Debug for AuthenticatedFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedFetch")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
