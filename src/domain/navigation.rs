//! Navigation root.
//!
//! The app shows exactly one of two screen stacks, or a loading indicator
//! while the session is being resolved. [`active_stack`] is the whole
//! decision; [`NavigationRoot`] follows session changes and reports when the
//! stack flips.

use tokio::sync::watch;
use tracing::debug;

use crate::auth::SessionState;

/// Which stack the UI should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveStack {
    Loading,
    /// Sign-in and sign-up screens.
    Auth,
    /// Diary screens.
    App,
}

/// Screens of the unauthenticated stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRoute {
    #[default]
    SignIn,
    SignUp,
}

/// Screens of the authenticated stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Main,
    Write { entry_id: Option<String> },
    View { entry_id: String },
    Analyze { entry_id: String },
}

impl ActiveStack {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveStack::Loading => "loading",
            ActiveStack::Auth => "auth",
            ActiveStack::App => "app",
        }
    }
}

/// Pick the stack for a session state.
pub fn active_stack(state: &SessionState) -> ActiveStack {
    match state {
        SessionState::Loading => ActiveStack::Loading,
        SessionState::Unauthenticated => ActiveStack::Auth,
        SessionState::Authenticated { .. } => ActiveStack::App,
    }
}

/// Tracks the active stack as the session changes.
#[derive(Debug)]
pub struct NavigationRoot {
    session: watch::Receiver<SessionState>,
    current: ActiveStack,
}

impl NavigationRoot {
    pub fn new(session: watch::Receiver<SessionState>) -> Self {
        let current = active_stack(&session.borrow());
        Self { session, current }
    }

    pub fn current(&self) -> ActiveStack {
        self.current
    }

    /// Wait for the next stack change.
    ///
    /// Session updates that keep the same stack (a new identity, say) are
    /// skipped. Returns `None` once the session manager is gone.
    pub async fn next_change(&mut self) -> Option<ActiveStack> {
        loop {
            self.session.changed().await.ok()?;
            let next = active_stack(&self.session.borrow_and_update());
            if next != self.current {
                debug!(from = self.current.as_str(), to = next.as_str(), "Switching screen stack");
                self.current = next;
                return Some(next);
            }
        }
    }
}
