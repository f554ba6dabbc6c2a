//! Result type alias for moodlog operations.

use super::moodlog_error::MoodlogError;

/// Result alias used by every API and screen operation.
pub type MoodlogResult<T> = Result<T, MoodlogError>;

/// Extension for attaching a log line to an error as it passes a boundary.
pub trait ResultExt<T> {
    /// Log the error at `warn` level with the given operation name, then
    /// return the result unchanged.
    fn log_failure(self, operation: &str) -> MoodlogResult<T>;
}

impl<T> ResultExt<T> for MoodlogResult<T> {
    fn log_failure(self, operation: &str) -> MoodlogResult<T> {
        if let Err(ref err) = self {
            tracing::warn!(
                operation,
                code = err.error_code(),
                category = err.category().as_str(),
                "{}",
                err
            );
        }
        self
    }
}
