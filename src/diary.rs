//! Diary and analysis endpoints.
//!
//! All calls go through [`AuthenticatedFetch`]. A 404 surfaces as
//! [`NetworkError::NotFound`], any other non-2xx as
//! [`NetworkError::HttpStatus`] with the server's message.

use chrono::NaiveDate;
use tracing::debug;

use crate::auth::AuthenticatedFetch;
use crate::error::{MoodlogResult, NetworkError};
use crate::models::analysis::{classify, AnalysisResponse};
use crate::models::{CreatedEntry, DiaryEntry, EntryUpdate, NewEntry};
use crate::traits::{Method, RequestOptions, Response};

const ENTRY: &str = "diary entry";
const ANALYSIS: &str = "analysis";

#[derive(Debug, Clone)]
pub struct DiaryApi {
    fetch: AuthenticatedFetch,
}

impl DiaryApi {
    pub fn new(fetch: AuthenticatedFetch) -> Self {
        Self { fetch }
    }

    /// All entries of a user.
    ///
    /// GET /api/diary/responses/{userId}
    pub async fn list(&self, user_id: &str) -> MoodlogResult<Vec<DiaryEntry>> {
        let path = format!("/api/diary/responses/{}", urlencoding::encode(user_id));
        let response = self.fetch.get(&path).await?;
        Ok(ensure_success(ENTRY, response)?.json()?)
    }

    /// Entries created between `start` and `end`, both inclusive.
    ///
    /// GET /api/diary/responses/{userId}/range?startDate=..&endDate=..
    pub async fn list_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> MoodlogResult<Vec<DiaryEntry>> {
        let path = format!(
            "/api/diary/responses/{}/range?startDate={}&endDate={}",
            urlencoding::encode(user_id),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        let response = self.fetch.get(&path).await?;
        Ok(ensure_success(ENTRY, response)?.json()?)
    }

    /// GET /api/diary/response/{id}
    pub async fn get(&self, id: &str) -> MoodlogResult<DiaryEntry> {
        let response = self.fetch.get(&entry_path(id)).await?;
        Ok(ensure_success(ENTRY, response)?.json()?)
    }

    /// Create an entry and start its analysis. Returns the new entry id.
    ///
    /// POST /api/diary/analyze
    pub async fn create_and_analyze(
        &self,
        title: &str,
        content: &str,
        user_id: &str,
    ) -> MoodlogResult<String> {
        let body = NewEntry {
            title,
            content,
            user_id,
        };
        let options = RequestOptions::json(Method::Post, &body)?;
        let response = self.fetch.request("/api/diary/analyze", options).await?;
        let created: CreatedEntry = ensure_success(ENTRY, response)?.json()?;
        debug!(entry_id = %created.id, "Entry created");
        Ok(created.id)
    }

    /// PUT /api/diary/response/{id}
    pub async fn update(&self, id: &str, title: &str, content: &str) -> MoodlogResult<()> {
        let body = EntryUpdate {
            diary_title: title,
            diary_content: content,
        };
        let options = RequestOptions::json(Method::Put, &body)?;
        let response = self.fetch.request(&entry_path(id), options).await?;
        ensure_success(ENTRY, response)?;
        Ok(())
    }

    /// DELETE /api/diary/response/{id}
    pub async fn delete(&self, id: &str) -> MoodlogResult<()> {
        let options = RequestOptions::with_method(Method::Delete);
        let response = self.fetch.request(&entry_path(id), options).await?;
        ensure_success(ENTRY, response)?;
        debug!(entry_id = id, "Entry deleted");
        Ok(())
    }

    /// Ask the backend to analyze an existing entry.
    ///
    /// POST /api/diaries/{id}/analysis
    pub async fn request_analysis(&self, id: &str) -> MoodlogResult<()> {
        let options = RequestOptions::with_method(Method::Post);
        let response = self.fetch.request(&analysis_path(id), options).await?;
        ensure_success(ANALYSIS, response)?;
        Ok(())
    }

    /// GET /api/diaries/{id}/analysis
    pub async fn fetch_analysis(&self, id: &str) -> MoodlogResult<AnalysisResponse> {
        let response = self.fetch.get(&analysis_path(id)).await?;
        let body: serde_json::Value = ensure_success(ANALYSIS, response)?.json()?;
        Ok(classify(&body)?)
    }
}

fn entry_path(id: &str) -> String {
    format!("/api/diary/response/{}", urlencoding::encode(id))
}

fn analysis_path(id: &str) -> String {
    format!("/api/diaries/{}/analysis", urlencoding::encode(id))
}

fn ensure_success(resource: &str, response: Response) -> Result<Response, NetworkError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::from_status(resource, &response))
    }
}
