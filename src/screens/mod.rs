//! Headless screen controllers.
//!
//! Each controller owns one screen's request flow and transient state and
//! leaves presentation to the caller. Controllers that need a user id fail
//! with `AuthError::NotAuthenticated` before sending anything when the
//! session has no identity. Loads go through a [`MountGuard`] so results
//! that arrive after teardown are dropped.
//!
//! [`MountGuard`]: crate::domain::MountGuard

pub mod analysis;
pub mod diary_list;
pub mod editor;
pub mod entry_view;
pub mod login;
pub mod signup;

pub use analysis::AnalysisScreen;
pub use diary_list::{DiaryListScreen, ListQuery};
pub use editor::{EntryEditor, SubmitOutcome};
pub use entry_view::EntryView;
pub use login::LoginScreen;
pub use signup::{FieldCheck, Notice, SignupForm, SignupScreen};
