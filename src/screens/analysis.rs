//! Analysis result screen.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::SessionManager;
use crate::diary::DiaryApi;
use crate::domain::mount::MountGuard;
use crate::error::{MoodlogResult, ResultExt};
use crate::models::AnalysisResponse;

#[derive(Debug)]
pub struct AnalysisScreen {
    diary: DiaryApi,
    session: Arc<SessionManager>,
    entry_id: String,
    mount: MountGuard,
}

impl AnalysisScreen {
    pub fn new(diary: DiaryApi, session: Arc<SessionManager>, entry_id: impl Into<String>) -> Self {
        Self {
            diary,
            session,
            entry_id: entry_id.into(),
            mount: MountGuard::new(),
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Fetch the analysis once.
    ///
    /// `Ok(None)` if the screen was unmounted before the answer arrived.
    pub async fn load(&self) -> MoodlogResult<Option<AnalysisResponse>> {
        self.session.require_identity()?;
        let response = self
            .diary
            .fetch_analysis(&self.entry_id)
            .await
            .log_failure("fetch_analysis")?;
        Ok(self.mount.keep(response))
    }

    /// Re-fetch every `interval` while the analysis is still running.
    ///
    /// Stops at the first complete result, the first error, after
    /// `max_polls` fetches (returning the last progress), or on unmount.
    pub async fn poll(
        &self,
        interval: Duration,
        max_polls: usize,
    ) -> MoodlogResult<Option<AnalysisResponse>> {
        let mut last = None;
        for attempt in 1..=max_polls.max(1) {
            let Some(response) = self.load().await? else {
                return Ok(None);
            };
            if response.is_complete() {
                return Ok(Some(response));
            }
            debug!(entry_id = %self.entry_id, attempt, "Analysis still running");
            last = Some(response);

            if attempt < max_polls {
                tokio::time::sleep(interval).await;
                if !self.mount.is_mounted() {
                    return Ok(None);
                }
            }
        }
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryTokenStore, MockHttpClient, MockResponse};
    use crate::auth::{AuthApi, AuthenticatedFetch};
    use crate::error::MoodlogError;
    use serde_json::json;

    const BASE: &str = "http://api.test";
    const URL: &str = "http://api.test/api/diaries/8/analysis";

    async fn screen(http: &MockHttpClient) -> AnalysisScreen {
        http.set_response(
            "http://api.test/auth/me",
            MockResponse::json(200, json!({"id": 1, "name": "bora"})),
        );
        let session = Arc::new(SessionManager::new(
            Arc::new(InMemoryTokenStore::new()),
            AuthApi::new(Arc::new(http.clone()), BASE),
        ));
        session.sign_in("T").await.unwrap();
        http.clear_requests();
        let fetch = AuthenticatedFetch::new(Arc::new(http.clone()), BASE, Arc::clone(&session));
        AnalysisScreen::new(DiaryApi::new(fetch), session, "8")
    }

    fn in_progress() -> MockResponse {
        MockResponse::json(200, json!({"message": "분석 중", "progress": 40, "estimatedRemaining": "1m"}))
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_at_cap_with_last_progress() {
        let http = MockHttpClient::new();
        let analysis = screen(&http).await;
        http.set_response(URL, in_progress());

        let result = analysis.poll(Duration::from_secs(1), 3).await.unwrap();
        assert!(matches!(result, Some(AnalysisResponse::InProgress(_))));
        assert_eq!(http.get_requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_on_complete() {
        let http = MockHttpClient::new();
        let analysis = screen(&http).await;
        http.set_response(
            URL,
            MockResponse::json(200, json!({"analysis": {"emotionSummary": "calm", "status": "POSITIVE"}})),
        );

        let result = analysis.poll(Duration::from_secs(1), 10).await.unwrap();
        assert!(result.unwrap().is_complete());
        assert_eq!(http.get_requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_on_error() {
        let http = MockHttpClient::new();
        let analysis = screen(&http).await;
        http.set_response(URL, MockResponse::json(200, json!({"unexpected": true})));

        let err = analysis.poll(Duration::from_secs(1), 10).await.unwrap_err();
        assert!(matches!(err, MoodlogError::AnalysisFormat(_)));
        assert_eq!(http.get_requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_on_unmount() {
        let http = MockHttpClient::new();
        let analysis = screen(&http).await;
        http.set_response(URL, in_progress());

        let guard = analysis.mount_guard();
        let unmount = async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            guard.unmount();
        };
        let (result, ()) = tokio::join!(analysis.poll(Duration::from_secs(1), 10), unmount);
        assert_eq!(result.unwrap(), None);
        assert_eq!(http.get_requests().len(), 2);
    }
}
