//! Authentication and session handling.
//!
//! - [`token`] decodes session token claims
//! - [`api`] talks to the login, identity, and signup endpoints
//! - [`session`] owns the token and publishes session state
//! - [`fetch`] attaches the session token to outgoing requests

pub mod api;
pub mod fetch;
pub mod session;
pub mod token;

pub use api::{hash_password, AuthApi, Availability, DuplicateField, SignupRequest};
pub use fetch::AuthenticatedFetch;
pub use session::{SessionManager, SessionState};
pub use token::{decode_claims, decode_claims_as, TokenClaims, TokenDecodeError};
