//! Unified error handling.
//!
//! - **Categories**: coarse classification used for hints and reauth decisions
//! - **Domain errors**: [`NetworkError`] and [`AuthError`]
//! - **Unified error**: [`MoodlogError`] wraps every error a screen can see
//! - **Result alias**: [`MoodlogResult`]
//!
//! | Category | Description | Try again? |
//! |----------|-------------|------------|
//! | Network | Connection, timeout | Yes |
//! | Auth | Missing or rejected session | After signing in |
//! | Server | 5xx, unusable body | Yes |
//! | Client | Local decode failure | No |
//! | User | Input or selection needs fixing | After fixing |
//! | System | Secure credential store | Sometimes |
//!
//! Nothing here retries. A failed request is reported once and the user
//! decides whether to trigger it again.

mod auth;
mod category;
mod moodlog_error;
mod network;
mod result;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use moodlog_error::MoodlogError;
pub use network::NetworkError;
pub use result::{MoodlogResult, ResultExt};
