//! Sign-up screen.
//!
//! Holds the form and keeps three uniqueness checks (login id, email,
//! nickname) running behind a debounce. Each field change resets that
//! field's availability. A check result is applied only if no newer check
//! was scheduled and the field still holds the value that was checked.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use crate::auth::{AuthApi, DuplicateField, SignupRequest};
use crate::domain::debounce::Debouncer;
use crate::domain::validation::{
    is_login_id_too_short, is_valid_password, is_valid_signup_email, ValidationError,
};
use crate::error::{AuthError, MoodlogResult};

/// Availability state of one checked field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCheck {
    /// `None` until a check for the current value has answered.
    pub available: Option<bool>,
    /// Inline text under the field: a local rule or the server's wording.
    pub error: Option<String>,
}

impl FieldCheck {
    fn reset(&mut self) {
        self.available = None;
        self.error = None;
    }

    fn is_available(&self) -> bool {
        self.available == Some(true)
    }
}

/// Everything the sign-up form shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub login_id: String,
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub confirm_password: String,
    pub email_code: String,
    pub login_id_check: FieldCheck,
    pub email_check: FieldCheck,
    pub nickname_check: FieldCheck,
    pub password_error: Option<String>,
    pub email_verified: bool,
    pub agree_terms: bool,
    pub agree_privacy: bool,
}

impl SignupForm {
    fn value(&self, field: DuplicateField) -> &str {
        match field {
            DuplicateField::LoginId => &self.login_id,
            DuplicateField::Email => &self.email,
            DuplicateField::Nickname => &self.nickname,
        }
    }

    /// Availability state of one checked field.
    pub fn check(&self, field: DuplicateField) -> &FieldCheck {
        match field {
            DuplicateField::LoginId => &self.login_id_check,
            DuplicateField::Email => &self.email_check,
            DuplicateField::Nickname => &self.nickname_check,
        }
    }

    fn check_mut(&mut self, field: DuplicateField) -> &mut FieldCheck {
        match field {
            DuplicateField::LoginId => &mut self.login_id_check,
            DuplicateField::Email => &mut self.email_check,
            DuplicateField::Nickname => &mut self.nickname_check,
        }
    }

    /// Whether the form may be submitted.
    pub fn is_complete(&self) -> bool {
        !self.login_id.is_empty()
            && self.login_id_check.is_available()
            && !self.email.is_empty()
            && self.email_check.is_available()
            && is_valid_password(&self.password, &self.login_id)
            && self.password == self.confirm_password
            && self.email_verified
            && !self.nickname.is_empty()
            && self.nickname_check.is_available()
            && self.agree_terms
            && self.agree_privacy
    }

    /// First unmet submit condition, for the error shown on a blocked submit.
    fn first_gap(&self) -> Option<ValidationError> {
        if self.login_id.is_empty() {
            return Some(ValidationError::Required("login ID"));
        }
        if !self.login_id_check.is_available() {
            return Some(ValidationError::Incomplete(
                "Login ID is not confirmed as available.".to_string(),
            ));
        }
        if self.email.is_empty() {
            return Some(ValidationError::EmailMissing);
        }
        if !self.email_check.is_available() {
            return Some(ValidationError::Incomplete(
                "Email is not confirmed as available.".to_string(),
            ));
        }
        if !is_valid_password(&self.password, &self.login_id) {
            return Some(ValidationError::WeakPassword);
        }
        if self.password != self.confirm_password {
            return Some(ValidationError::PasswordMismatch);
        }
        if !self.email_verified {
            return Some(ValidationError::Incomplete(
                "Please verify your email first.".to_string(),
            ));
        }
        if self.nickname.is_empty() {
            return Some(ValidationError::Required("nickname"));
        }
        if !self.nickname_check.is_available() {
            return Some(ValidationError::Incomplete(
                "Nickname is not confirmed as available.".to_string(),
            ));
        }
        if !(self.agree_terms && self.agree_privacy) {
            return Some(ValidationError::Incomplete(
                "Please accept the terms and the privacy policy.".to_string(),
            ));
        }
        None
    }
}

const SETTLE_POLL: Duration = Duration::from_millis(25);

/// Server reply to an email code request or confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

pub struct SignupScreen {
    auth: AuthApi,
    form: Arc<Mutex<SignupForm>>,
    login_id_check: Debouncer,
    email_check: Debouncer,
    nickname_check: Debouncer,
}

impl SignupScreen {
    pub fn new(auth: AuthApi, debounce_delay: Duration) -> Self {
        Self {
            auth,
            form: Arc::new(Mutex::new(SignupForm::default())),
            login_id_check: Debouncer::new(debounce_delay),
            email_check: Debouncer::new(debounce_delay),
            nickname_check: Debouncer::new(debounce_delay),
        }
    }

    /// Current form state.
    pub fn form(&self) -> SignupForm {
        self.lock_form().clone()
    }

    pub fn set_login_id(&self, value: &str) {
        {
            let mut form = self.lock_form();
            form.login_id = value.to_string();
            form.login_id_check.reset();
            if is_login_id_too_short(value) {
                form.login_id_check.error = Some(ValidationError::LoginIdTooShort.to_string());
            }
        }
        if value.is_empty() || is_login_id_too_short(value) {
            self.login_id_check.cancel();
        } else {
            self.schedule_check(DuplicateField::LoginId, value);
        }
    }

    pub fn set_email(&self, value: &str) {
        let valid = is_valid_signup_email(value);
        {
            let mut form = self.lock_form();
            form.email = value.to_string();
            form.email_check.reset();
            // A changed address needs a fresh code.
            form.email_verified = false;
            if !value.is_empty() && !valid {
                form.email_check.error = Some(ValidationError::EmailFormat.to_string());
            }
        }
        if valid {
            self.schedule_check(DuplicateField::Email, value);
        } else {
            self.email_check.cancel();
        }
    }

    pub fn set_nickname(&self, value: &str) {
        {
            let mut form = self.lock_form();
            form.nickname = value.to_string();
            form.nickname_check.reset();
        }
        if value.is_empty() {
            self.nickname_check.cancel();
        } else {
            self.schedule_check(DuplicateField::Nickname, value);
        }
    }

    pub fn set_password(&self, value: &str) {
        let mut form = self.lock_form();
        form.password = value.to_string();
        form.password_error = if !value.is_empty() && !is_valid_password(value, &form.login_id) {
            Some(ValidationError::WeakPassword.to_string())
        } else if !form.confirm_password.is_empty() && value != form.confirm_password {
            Some(ValidationError::PasswordMismatch.to_string())
        } else {
            None
        };
    }

    pub fn set_confirm_password(&self, value: &str) {
        let mut form = self.lock_form();
        form.confirm_password = value.to_string();
        form.password_error = if !form.password.is_empty() && value != form.password {
            Some(ValidationError::PasswordMismatch.to_string())
        } else {
            None
        };
    }

    pub fn set_email_code(&self, value: &str) {
        self.lock_form().email_code = value.to_string();
    }

    pub fn set_consents(&self, terms: bool, privacy: bool) {
        let mut form = self.lock_form();
        form.agree_terms = terms;
        form.agree_privacy = privacy;
    }

    /// Wait until the check for `field` has an answer or `timeout` passes.
    ///
    /// For front ends without a render loop. Returns the check as it stands.
    pub async fn settled_check(&self, field: DuplicateField, timeout: Duration) -> FieldCheck {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let check = self.lock_form().check(field).clone();
            if check.available.is_some()
                || check.error.is_some()
                || tokio::time::Instant::now() >= deadline
            {
                return check;
            }
            tokio::time::sleep(SETTLE_POLL).await;
        }
    }

    pub fn can_submit(&self) -> bool {
        self.lock_form().is_complete()
    }

    /// Ask the backend to mail a verification code.
    ///
    /// Only allowed once the email has been confirmed as available.
    pub async fn request_email_code(&self) -> MoodlogResult<Notice> {
        let email = {
            let form = self.lock_form();
            if !form.email_check.is_available() {
                return Err(ValidationError::Incomplete(
                    "Please enter an available email first.".to_string(),
                )
                .into());
            }
            form.email.clone()
        };

        let envelope = self.auth.request_email_code(&email).await?;
        Ok(Notice {
            success: envelope.is_success(),
            message: envelope.message,
        })
    }

    /// Confirm the mailed code. Success marks the email as verified.
    pub async fn verify_email_code(&self) -> MoodlogResult<Notice> {
        let (email, code) = {
            let form = self.lock_form();
            (form.email.clone(), form.email_code.clone())
        };

        let envelope = self.auth.verify_email_code(&email, &code).await?;
        let success = envelope.is_success();
        {
            let mut form = self.lock_form();
            // The email may have been edited while the request was out.
            if form.email == email {
                form.email_verified = success;
            }
        }
        Ok(Notice {
            success,
            message: envelope.message,
        })
    }

    /// Create the account. Returns the server's confirmation message.
    pub async fn submit(&self) -> MoodlogResult<String> {
        let request = {
            let form = self.lock_form();
            if let Some(gap) = form.first_gap() {
                return Err(gap.into());
            }
            SignupRequest {
                login_id: form.login_id.clone(),
                user_pw: form.password.clone(),
                email: form.email.clone(),
                nickname: form.nickname.clone(),
            }
        };

        let envelope = self.auth.join(&request).await?;
        if envelope.is_success() {
            info!("Account created");
            Ok(envelope.message)
        } else {
            Err(AuthError::SignupRejected {
                message: envelope.message,
            }
            .into())
        }
    }

    fn schedule_check(&self, field: DuplicateField, value: &str) {
        let debouncer = match field {
            DuplicateField::LoginId => &self.login_id_check,
            DuplicateField::Email => &self.email_check,
            DuplicateField::Nickname => &self.nickname_check,
        };
        let auth = self.auth.clone();
        let form = Arc::clone(&self.form);
        let value = value.to_string();

        debouncer.schedule(move |ticket| async move {
            let result = auth.check_duplicate(field, &value).await;

            let mut form = lock(&form);
            if !ticket.is_current() || form.value(field) != value {
                debug!(field = field.as_str(), "Discarding stale uniqueness result");
                return;
            }
            let check = form.check_mut(field);
            match result {
                Ok(availability) => {
                    check.available = Some(availability.available);
                    check.error = (!availability.available).then_some(availability.message);
                }
                Err(e) => {
                    check.available = None;
                    check.error = Some(e.user_message());
                }
            }
        });
    }

    fn lock_form(&self) -> MutexGuard<'_, SignupForm> {
        lock(&self.form)
    }
}

fn lock(form: &Mutex<SignupForm>) -> MutexGuard<'_, SignupForm> {
    // Every write leaves the form consistent, so a poisoned lock is still usable.
    form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl std::fmt::Debug for SignupScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupScreen")
            .field("form", &*self.lock_form())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::error::MoodlogError;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(300);

    fn screen(http: &MockHttpClient) -> SignupScreen {
        SignupScreen::new(AuthApi::new(Arc::new(http.clone()), "http://api.test"), DELAY)
    }

    fn available(http: &MockHttpClient, field: &str) {
        http.set_response(
            &format!("http://api.test/api/public/check/{}/IsDuplicate", field),
            MockResponse::json(200, json!({"status": "success", "message": "ok", "data": true})),
        );
    }

    fn fill_valid(signup: &SignupScreen) {
        signup.set_login_id("bora");
        signup.set_email("me@example.com");
        signup.set_nickname("moon");
        signup.set_password("Abcd1234!");
        signup.set_confirm_password("Abcd1234!");
        signup.set_consents(true, true);
    }

    #[test]
    fn test_short_login_id_is_flagged_locally() {
        let http = MockHttpClient::new();
        let signup = screen(&http);
        // Too short, so no check gets scheduled and no runtime is needed.
        signup.set_login_id("abc");
        let form = signup.form();
        assert!(form.login_id_check.error.is_some());
        assert_eq!(form.login_id_check.available, None);
    }

    #[test]
    fn test_password_errors() {
        let signup = screen(&MockHttpClient::new());
        signup.set_password("weak");
        assert!(signup.form().password_error.is_some());

        signup.set_password("Abcd1234!");
        assert!(signup.form().password_error.is_none());

        signup.set_confirm_password("Abcd1234?");
        assert_eq!(
            signup.form().password_error,
            Some(ValidationError::PasswordMismatch.to_string())
        );
        signup.set_confirm_password("Abcd1234!");
        assert!(signup.form().password_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_sends_one_check() {
        let http = MockHttpClient::new();
        available(&http, "loginId");
        let signup = screen(&http);

        for value in ["bora", "boram", "boram1"] {
            signup.set_login_id(value);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(DELAY * 2).await;

        let requests = http.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"loginId":"boram1"}"#));
        assert_eq!(signup.form().login_id_check.available, Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_shows_server_message() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/api/public/check/nickname/IsDuplicate",
            MockResponse::json(200, json!({"status": "success", "message": "이미 사용 중인 닉네임", "data": false})),
        );
        let signup = screen(&http);

        signup.set_nickname("moon");
        tokio::time::sleep(DELAY * 2).await;

        let check = signup.form().nickname_check;
        assert_eq!(check.available, Some(false));
        assert_eq!(check.error.as_deref(), Some("이미 사용 중인 닉네임"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_resets_availability() {
        let http = MockHttpClient::new();
        available(&http, "email");
        let signup = screen(&http);

        signup.set_email("me@example.com");
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(signup.form().email_check.available, Some(true));

        signup.set_email("me@example");
        let form = signup.form();
        assert_eq!(form.email_check.available, None);
        assert!(form.email_check.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_gate() {
        let http = MockHttpClient::new();
        for field in ["loginId", "email", "nickname"] {
            available(&http, field);
        }
        http.set_response(
            "http://api.test/api/public/emailCheck",
            MockResponse::json(200, json!({"status": "success", "message": "인증 완료"})),
        );
        http.set_response(
            "http://api.test/api/public/join",
            MockResponse::json(200, json!({"status": "success", "message": "가입 완료"})),
        );
        let signup = screen(&http);

        fill_valid(&signup);
        tokio::time::sleep(DELAY * 2).await;
        assert!(!signup.can_submit());
        let err = signup.submit().await.unwrap_err();
        assert!(matches!(err, MoodlogError::Validation(ValidationError::Incomplete(_))));

        signup.set_email_code("123456");
        let notice = signup.verify_email_code().await.unwrap();
        assert!(notice.success);
        assert!(signup.can_submit());

        assert_eq!(signup.submit().await.unwrap(), "가입 완료");
        let join = http.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_str(join.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"loginId": "bora", "userPw": "Abcd1234!", "email": "me@example.com", "nickname": "moon"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_check_waits_for_answer() {
        let http = MockHttpClient::new();
        available(&http, "loginId");
        let signup = screen(&http);

        signup.set_login_id("bora");
        let check = signup
            .settled_check(DuplicateField::LoginId, Duration::from_secs(5))
            .await;
        assert_eq!(check.available, Some(true));

        signup.set_login_id("abc");
        let check = signup
            .settled_check(DuplicateField::LoginId, Duration::from_secs(5))
            .await;
        assert_eq!(check.available, None);
        assert!(check.error.is_some());
    }

    #[tokio::test]
    async fn test_email_code_requires_available_email() {
        let http = MockHttpClient::new();
        let signup = screen(&http);
        let err = signup.request_email_code().await.unwrap_err();
        assert!(matches!(err, MoodlogError::Validation(_)));
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_rejected() {
        let http = MockHttpClient::new();
        for field in ["loginId", "email", "nickname"] {
            available(&http, field);
        }
        http.set_response(
            "http://api.test/api/public/emailCheck",
            MockResponse::json(200, json!({"status": "success", "message": "ok"})),
        );
        http.set_response(
            "http://api.test/api/public/join",
            MockResponse::json(200, json!({"status": "fail", "message": "이미 가입된 이메일"})),
        );
        let signup = screen(&http);
        fill_valid(&signup);
        tokio::time::sleep(DELAY * 2).await;
        signup.verify_email_code().await.unwrap();

        let err = signup.submit().await.unwrap_err();
        assert!(matches!(err, MoodlogError::Auth(AuthError::SignupRejected { .. })));
        assert_eq!(err.user_message(), "이미 가입된 이메일");
    }
}
