//! Diary entry DTOs.
//!
//! The list and detail endpoints disagree on field names (`diaryTitle` vs
//! `title`, `createdAt` vs `date`, `aiResponse` vs `hasAnalysis`), so the
//! entry accepts either spelling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::deserialize_id;

/// A diary entry as held by the client for one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDiaryEntry")]
pub struct DiaryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    /// Whether the backend already holds an analysis for this entry.
    pub has_analysis: bool,
}

/// Wire form carrying every spelling; a body may hold both at once.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiaryEntry {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    diary_title: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    diary_content: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    has_analysis: Value,
    #[serde(default)]
    ai_response: Value,
}

/// JSON truthiness: null, false, zero and the empty string are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<RawDiaryEntry> for DiaryEntry {
    fn from(raw: RawDiaryEntry) -> Self {
        Self {
            id: raw.id,
            title: raw.diary_title.or(raw.title).unwrap_or_default(),
            content: raw.diary_content.or(raw.content).unwrap_or_default(),
            created_at: raw.created_at.or(raw.date).unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
            has_analysis: truthy(&raw.has_analysis) || truthy(&raw.ai_response),
        }
    }
}

impl DiaryEntry {
    /// The `YYYY-MM-DD` part of `created_at`.
    pub fn date_str(&self) -> &str {
        self.created_at
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(&self.created_at)
    }

    /// Creation date, if `created_at` starts with a valid calendar date.
    pub fn created_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_str(), "%Y-%m-%d").ok()
    }

    /// Case-sensitive substring match on title or content.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.content.contains(needle)
    }
}

/// One row of the diary list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiarySummary {
    pub id: String,
    pub title: String,
    pub date: String,
}

impl From<&DiaryEntry> for DiarySummary {
    fn from(entry: &DiaryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            date: entry.date_str().to_string(),
        }
    }
}

/// Body of `POST /api/diary/analyze`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub user_id: &'a str,
}

/// Body of `PUT /api/diary/response/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate<'a> {
    pub diary_title: &'a str,
    pub diary_content: &'a str,
}

/// Response of `POST /api/diary/analyze`. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}
