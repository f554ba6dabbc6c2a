//! Reqwest-based HTTP client adapter.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Method, RequestOptions, Response};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use moodlog::adapters::ReqwestHttpClient;
/// use moodlog::traits::{HttpClient, RequestOptions};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.request("http://localhost:7078/auth/me", &RequestOptions::get()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error, url: &str) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(url.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Body(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn request(&self, url: &str, options: &RequestOptions) -> Result<Response, HttpError> {
        let builder = self
            .client
            .request(Self::convert_method(options.method), url);
        let builder = Self::apply_headers(builder, &options.headers);
        let builder = match options.body {
            Some(ref body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Self::convert_error(e, url))?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::convert_error(e, url))?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}
