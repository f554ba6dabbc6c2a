//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - sends a request, returns the raw response
//! - [`TokenStore`] - persists the single session token

pub mod http;
pub mod token_store;

pub use http::{Headers, HttpClient, HttpError, Method, RequestOptions, Response};
pub use token_store::{TokenStore, TokenStoreError};
