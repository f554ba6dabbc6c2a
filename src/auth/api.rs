//! Client for the authentication and signup endpoints.
//!
//! These calls run before a session exists (or, for `/auth/me`, while one is
//! being established), so they attach credentials themselves instead of
//! going through [`AuthenticatedFetch`](super::fetch::AuthenticatedFetch).

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, MoodlogResult, NetworkError};
use crate::models::{ApiEnvelope, LoginResponse, User};
use crate::traits::{HttpClient, Method, RequestOptions, Response};

/// Field a uniqueness check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateField {
    LoginId,
    Email,
    Nickname,
}

impl DuplicateField {
    /// Name used in both the path and the request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::LoginId => "loginId",
            DuplicateField::Email => "email",
            DuplicateField::Nickname => "nickname",
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    /// Server wording, shown next to the field.
    pub message: String,
}

/// Body of `POST /api/public/join`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub login_id: String,
    pub user_pw: String,
    pub email: String,
    pub nickname: String,
}

/// Lowercase hex SHA-256 of `password`, the form `/auth/login` expects.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Auth and signup API client.
#[derive(Clone)]
pub struct AuthApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl AuthApi {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a session token.
    ///
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> MoodlogResult<String> {
        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::json!({
            "email": email,
            "password": hash_password(password),
        });
        let options = RequestOptions::json(Method::Post, &body)?;

        let response = self.http.request(&url, &options).await?;
        if !response.is_success() {
            return Err(AuthError::LoginRejected {
                message: response.error_message().unwrap_or_default(),
            }
            .into());
        }

        let data: LoginResponse = response.json()?;
        match data.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MissingToken.into()),
        }
    }

    /// Resolve the user a token belongs to.
    ///
    /// GET /auth/me
    pub async fn fetch_identity(&self, token: &str) -> MoodlogResult<User> {
        let url = format!("{}/auth/me", self.base_url);
        let options = RequestOptions::get().header("Authorization", format!("Bearer {}", token));

        let response = self.http.request(&url, &options).await?;
        if !response.is_success() {
            return Err(AuthError::SessionRejected {
                status: response.status,
            }
            .into());
        }
        Ok(response.json()?)
    }

    /// Ask whether `value` is still free for `field`.
    ///
    /// POST /api/public/check/{field}/IsDuplicate
    pub async fn check_duplicate(
        &self,
        field: DuplicateField,
        value: &str,
    ) -> MoodlogResult<Availability> {
        let path = format!("/api/public/check/{}/IsDuplicate", field.as_str());
        let mut body = serde_json::Map::new();
        body.insert(field.as_str().to_string(), value.into());

        let envelope: ApiEnvelope<bool> = self.post_public(&path, &body).await?;
        let available = envelope.data.ok_or_else(|| NetworkError::InvalidResponse {
            message: format!("{} check carried no result", field),
        })?;
        debug!(field = field.as_str(), available, "Uniqueness check answered");
        Ok(Availability {
            available,
            message: envelope.message,
        })
    }

    /// Send a verification code to `email`.
    ///
    /// POST /api/public/emailCode
    pub async fn request_email_code(
        &self,
        email: &str,
    ) -> MoodlogResult<ApiEnvelope<serde_json::Value>> {
        let body = serde_json::json!({ "email": email });
        self.post_public("/api/public/emailCode", &body).await
    }

    /// Confirm the code sent to `email`.
    ///
    /// POST /api/public/emailCheck
    pub async fn verify_email_code(
        &self,
        email: &str,
        code: &str,
    ) -> MoodlogResult<ApiEnvelope<serde_json::Value>> {
        let body = serde_json::json!({ "email": email, "code": code });
        self.post_public("/api/public/emailCheck", &body).await
    }

    /// Create an account.
    ///
    /// POST /api/public/join
    pub async fn join(&self, request: &SignupRequest) -> MoodlogResult<ApiEnvelope<serde_json::Value>> {
        self.post_public("/api/public/join", request).await
    }

    /// POST a JSON body to a public endpoint and read the envelope.
    ///
    /// These endpoints answer failures with the envelope too, so the body is
    /// read whatever the status. A non-2xx body that is not an envelope
    /// becomes a status error.
    async fn post_public<B, T>(&self, path: &str, body: &B) -> MoodlogResult<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let options = RequestOptions::json(Method::Post, body)?;
        let response = self.http.request(&url, &options).await?;
        Self::read_envelope(path, &response)
    }

    fn read_envelope<T: DeserializeOwned>(
        path: &str,
        response: &Response,
    ) -> MoodlogResult<ApiEnvelope<T>> {
        match response.json::<ApiEnvelope<T>>() {
            Ok(envelope) => Ok(envelope),
            Err(_) if !response.is_success() => {
                Err(NetworkError::from_status(path, response).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Debug for AuthApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
