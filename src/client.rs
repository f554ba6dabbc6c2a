//! Wiring of the session, the APIs, and the screen controllers.

use std::sync::Arc;

use crate::adapters::{KeychainTokenStore, ReqwestHttpClient};
use crate::auth::{AuthApi, AuthenticatedFetch, SessionManager};
use crate::config::ClientConfig;
use crate::diary::DiaryApi;
use crate::domain::navigation::NavigationRoot;
use crate::error::MoodlogResult;
use crate::screens::{
    AnalysisScreen, DiaryListScreen, EntryEditor, EntryView, LoginScreen, SignupScreen,
};
use crate::traits::{HttpClient, TokenStore};

/// One client per process. Screens are created from it on demand and share
/// its session.
#[derive(Debug, Clone)]
pub struct MoodlogClient {
    config: ClientConfig,
    session: Arc<SessionManager>,
    auth: AuthApi,
    diary: DiaryApi,
}

impl MoodlogClient {
    /// Client backed by reqwest and the platform keychain.
    pub fn from_config(config: ClientConfig) -> MoodlogResult<Self> {
        let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
        let store = Arc::new(KeychainTokenStore::new(
            config.keychain_service.clone(),
            config.keychain_account.clone(),
        ));
        Ok(Self::with_parts(config, http, store))
    }

    /// Client over caller-supplied transport and token storage.
    pub fn with_parts(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let auth = AuthApi::new(Arc::clone(&http), config.base_url.clone());
        let session = Arc::new(SessionManager::new(store, auth.clone()));
        let fetch = AuthenticatedFetch::new(http, config.base_url.clone(), Arc::clone(&session));
        Self {
            config,
            session,
            auth,
            diary: DiaryApi::new(fetch),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn diary(&self) -> &DiaryApi {
        &self.diary
    }

    pub fn navigation(&self) -> NavigationRoot {
        NavigationRoot::new(self.session.subscribe())
    }

    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(self.auth.clone(), Arc::clone(&self.session))
    }

    pub fn signup_screen(&self) -> SignupScreen {
        SignupScreen::new(self.auth.clone(), self.config.debounce_delay)
    }

    pub fn diary_list(&self) -> DiaryListScreen {
        DiaryListScreen::new(
            self.diary.clone(),
            Arc::clone(&self.session),
            self.config.page_size,
        )
    }

    pub fn new_entry(&self) -> EntryEditor {
        EntryEditor::create(self.diary.clone(), Arc::clone(&self.session))
    }

    pub fn edit_entry(&self, entry_id: &str) -> EntryEditor {
        EntryEditor::edit(self.diary.clone(), Arc::clone(&self.session), entry_id)
    }

    pub fn entry_view(&self, entry_id: &str) -> EntryView {
        EntryView::new(self.diary.clone(), Arc::clone(&self.session), entry_id)
    }

    pub fn analysis(&self, entry_id: &str) -> AnalysisScreen {
        AnalysisScreen::new(self.diary.clone(), Arc::clone(&self.session), entry_id)
    }
}
