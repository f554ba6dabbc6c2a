//! Sign-in screen.

use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthApi, SessionManager};
use crate::domain::validation::validate_login;
use crate::error::{MoodlogResult, ResultExt};

#[derive(Debug, Clone)]
pub struct LoginScreen {
    auth: AuthApi,
    session: Arc<SessionManager>,
}

impl LoginScreen {
    pub fn new(auth: AuthApi, session: Arc<SessionManager>) -> Self {
        Self { auth, session }
    }

    /// Validate, log in, and adopt the returned token.
    ///
    /// On success the session turns `Authenticated` and the navigation root
    /// switches to the app stack.
    pub async fn submit(&self, email: &str, password: &str) -> MoodlogResult<()> {
        validate_login(email, password)?;
        let token = self.auth.login(email, password).await.log_failure("login")?;
        self.session.sign_in(&token).await?;
        info!("Login completed");
        Ok(())
    }
}
