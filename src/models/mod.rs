//! Wire types for the journaling backend.

pub mod analysis;
pub mod api;
pub mod diary;
pub mod user;

pub use analysis::{
    classify, AnalysisFormatError, AnalysisProgress, AnalysisResponse, AnalysisResult,
    EmotionDetection, Sentiment,
};
pub use api::{ApiEnvelope, LoginResponse};
pub use diary::{CreatedEntry, DiaryEntry, DiarySummary, EntryUpdate, NewEntry};
pub use user::User;
