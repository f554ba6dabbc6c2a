//! Concrete implementations of the trait abstractions in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`KeychainTokenStore`] - session token in the platform keychain
//!
//! The [`mock`] submodule provides test doubles for both.

pub mod keychain_store;
pub mod mock;
pub mod reqwest_http;

pub use keychain_store::KeychainTokenStore;
pub use mock::{InMemoryTokenStore, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
