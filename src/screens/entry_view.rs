//! Entry detail screen.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::SessionManager;
use crate::diary::DiaryApi;
use crate::domain::mount::MountGuard;
use crate::error::{MoodlogResult, ResultExt};
use crate::models::DiaryEntry;

#[derive(Debug)]
pub struct EntryView {
    diary: DiaryApi,
    session: Arc<SessionManager>,
    entry_id: String,
    entry: Option<DiaryEntry>,
    mount: MountGuard,
}

impl EntryView {
    pub fn new(diary: DiaryApi, session: Arc<SessionManager>, entry_id: impl Into<String>) -> Self {
        Self {
            diary,
            session,
            entry_id: entry_id.into(),
            entry: None,
            mount: MountGuard::new(),
        }
    }

    pub fn entry(&self) -> Option<&DiaryEntry> {
        self.entry.as_ref()
    }

    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    /// Fetch the entry. `Ok(None)` if the screen was unmounted meanwhile.
    ///
    /// Without an identity nothing is sent.
    pub async fn load(&mut self) -> MoodlogResult<Option<DiaryEntry>> {
        self.session.require_identity()?;
        let entry = self.diary.get(&self.entry_id).await?;
        let Some(entry) = self.mount.keep(entry) else {
            return Ok(None);
        };
        self.entry = Some(entry.clone());
        Ok(Some(entry))
    }

    /// Make sure an analysis exists and return the id to open in the
    /// analysis view.
    ///
    /// Analysis is requested only when the entry has none yet.
    pub async fn analyze(&mut self) -> MoodlogResult<String> {
        self.session.require_identity()?;
        let has_analysis = match &self.entry {
            Some(entry) => entry.has_analysis,
            None => self.diary.get(&self.entry_id).await?.has_analysis,
        };

        if has_analysis {
            debug!(entry_id = %self.entry_id, "Analysis already present");
        } else {
            self.diary
                .request_analysis(&self.entry_id)
                .await
                .log_failure("request_analysis")?;
            info!(entry_id = %self.entry_id, "Analysis requested");
            if let Some(entry) = self.entry.as_mut() {
                entry.has_analysis = true;
            }
        }
        Ok(self.entry_id.clone())
    }

    /// Delete the entry. The caller navigates back afterwards.
    pub async fn delete(&mut self) -> MoodlogResult<()> {
        self.session.require_identity()?;
        self.diary
            .delete(&self.entry_id)
            .await
            .log_failure("delete_entry")?;
        self.entry = None;
        info!(entry_id = %self.entry_id, "Entry deleted");
        Ok(())
    }
}
