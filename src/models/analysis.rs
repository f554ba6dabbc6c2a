//! Analysis responses.
//!
//! `GET /api/diaries/{id}/analysis` answers with one of two bodies:
//!
//! - in progress: `{"message": "...", "progress": 42, "estimatedRemaining": "2m"}`
//! - complete: `{"analysis": {...}}`
//!
//! [`classify`] tells them apart by shape. In-progress is checked first, so a
//! body carrying both is still treated as in progress.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body matched neither analysis shape.
#[derive(Debug, Error)]
pub enum AnalysisFormatError {
    #[error("unknown analysis response format")]
    UnknownShape,

    #[error("analysis object could not be read")]
    Malformed(#[from] serde_json::Error),
}

/// Read a field, falling back to its default when the value has the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?))
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or_default())
}

/// Emotion intensities in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionDetection {
    #[serde(default, deserialize_with = "lenient_percent")]
    pub joy: f64,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub sadness: f64,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub surprise: f64,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub calm: f64,
}

impl EmotionDetection {
    /// Labelled pairs in display order.
    pub fn pairs(&self) -> [(&'static str, f64); 4] {
        [
            ("joy", self.joy),
            ("sadness", self.sadness),
            ("surprise", self.surprise),
            ("calm", self.calm),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// Any label this client does not know.
    #[serde(other)]
    Unknown,
}

/// Completed analysis of one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub emotion_detection: EmotionDetection,
    #[serde(default, deserialize_with = "lenient")]
    pub emotion_summary: String,
    /// Automatic thought the entry suggests.
    #[serde(default, deserialize_with = "lenient")]
    pub automatic_thought: String,
    /// Prompt nudging the writer to re-examine that thought.
    #[serde(default, deserialize_with = "lenient")]
    pub prompt_for_change: String,
    #[serde(default, deserialize_with = "lenient")]
    pub alternative_thought: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Sentiment>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
    /// ISO 8601 timestamp.
    #[serde(default, deserialize_with = "lenient")]
    pub analyzed_at: Option<String>,
}

/// Server-side analysis still running.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisProgress {
    pub message: String,
    pub progress: f64,
    pub estimated_remaining: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    InProgress(AnalysisProgress),
    Complete(Box<AnalysisResult>),
}

impl AnalysisResponse {
    pub fn is_complete(&self) -> bool {
        matches!(self, AnalysisResponse::Complete(_))
    }
}

/// Classify a parsed analysis body.
pub fn classify(body: &Value) -> Result<AnalysisResponse, AnalysisFormatError> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());
    let progress = body.get("progress").and_then(Value::as_f64);

    if let (Some(message), Some(progress)) = (message, progress) {
        return Ok(AnalysisResponse::InProgress(AnalysisProgress {
            message: message.to_string(),
            progress,
            estimated_remaining: body
                .get("estimatedRemaining")
                .and_then(Value::as_str)
                .map(str::to_string),
        }));
    }

    match body.get("analysis") {
        Some(analysis @ Value::Object(_)) => {
            let result = AnalysisResult::deserialize(analysis)?;
            Ok(AnalysisResponse::Complete(Box::new(result)))
        }
        _ => Err(AnalysisFormatError::UnknownShape),
    }
}
