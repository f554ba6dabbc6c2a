//! Client-side domain logic that does not talk to the network.
//!
//! - [`validation`] - login and signup form rules
//! - [`debounce`] - cancellable delayed tasks for uniqueness checks
//! - [`navigation`] - session state to screen stack
//! - [`pagination`] - client-side paging of loaded lists
//! - [`mount`] - discard results that arrive after a screen is gone

pub mod debounce;
pub mod mount;
pub mod navigation;
pub mod pagination;
pub mod validation;

pub use debounce::{Debouncer, Ticket};
pub use mount::MountGuard;
pub use navigation::{active_stack, ActiveStack, AppRoute, AuthRoute, NavigationRoot};
pub use pagination::Page;
pub use validation::ValidationError;
