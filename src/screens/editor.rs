//! Write/edit screen.

use std::sync::Arc;
use tracing::info;

use crate::auth::SessionManager;
use crate::diary::DiaryApi;
use crate::domain::mount::MountGuard;
use crate::domain::ValidationError;
use crate::error::{MoodlogResult, ResultExt};

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new entry was stored and its analysis started. Open the analysis
    /// view for `entry_id` next.
    Created { entry_id: String },
    /// An existing entry was changed.
    Updated { entry_id: String },
}

#[derive(Debug)]
pub struct EntryEditor {
    diary: DiaryApi,
    session: Arc<SessionManager>,
    entry_id: Option<String>,
    title: String,
    content: String,
    mount: MountGuard,
}

impl EntryEditor {
    /// Editor for a new entry.
    pub fn create(diary: DiaryApi, session: Arc<SessionManager>) -> Self {
        Self {
            diary,
            session,
            entry_id: None,
            title: String::new(),
            content: String::new(),
            mount: MountGuard::new(),
        }
    }

    /// Editor for an existing entry. Call [`load`](Self::load) to fill it.
    pub fn edit(diary: DiaryApi, session: Arc<SessionManager>, entry_id: impl Into<String>) -> Self {
        Self {
            entry_id: Some(entry_id.into()),
            ..Self::create(diary, session)
        }
    }

    pub fn is_edit(&self) -> bool {
        self.entry_id.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    /// Fill title and content from the stored entry.
    ///
    /// A no-op in create mode. `Ok(None)` if unmounted before the entry
    /// arrived; a missing entry is a not-found error. Edit mode needs an
    /// identity before anything is sent.
    pub async fn load(&mut self) -> MoodlogResult<Option<()>> {
        let Some(id) = self.entry_id.as_deref() else {
            return Ok(Some(()));
        };
        self.session.require_identity()?;
        let entry = self.diary.get(id).await?;
        if !self.mount.is_mounted() {
            return Ok(None);
        }
        self.title = entry.title;
        self.content = entry.content;
        Ok(Some(()))
    }

    /// Save the entry.
    ///
    /// Title and content are trimmed and must not be blank. A user id is
    /// required; without one nothing is sent.
    pub async fn submit(&self) -> MoodlogResult<SubmitOutcome> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() {
            return Err(ValidationError::Required("title").into());
        }
        if content.is_empty() {
            return Err(ValidationError::Required("content").into());
        }
        let user = self.session.require_identity()?;

        match &self.entry_id {
            Some(id) => {
                self.diary
                    .update(id, title, content)
                    .await
                    .log_failure("update_entry")?;
                info!(entry_id = %id, "Entry updated");
                Ok(SubmitOutcome::Updated {
                    entry_id: id.clone(),
                })
            }
            None => {
                let entry_id = self
                    .diary
                    .create_and_analyze(title, content, &user.id)
                    .await
                    .log_failure("create_entry")?;
                info!(entry_id = %entry_id, "Entry created");
                Ok(SubmitOutcome::Created { entry_id })
            }
        }
    }
}
