//! Main screen: the diary list.
//!
//! Two modes share one pager. With no date selected the full list is loaded
//! and filtered by the search text on the client; with a date selected only
//! that day's entries are fetched. Choosing a date clears the search and
//! searching clears the date. Either resets to the first page.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::auth::SessionManager;
use crate::diary::DiaryApi;
use crate::domain::mount::MountGuard;
use crate::domain::pagination::Page;
use crate::domain::ValidationError;
use crate::error::MoodlogResult;
use crate::models::{DiaryEntry, DiarySummary};

/// What the list is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub date: Option<NaiveDate>,
    pub page: usize,
}

#[derive(Debug)]
pub struct DiaryListScreen {
    diary: DiaryApi,
    session: Arc<SessionManager>,
    page_size: usize,
    query: ListQuery,
    mount: MountGuard,
}

impl DiaryListScreen {
    pub fn new(diary: DiaryApi, session: Arc<SessionManager>, page_size: usize) -> Self {
        Self {
            diary,
            session,
            page_size: page_size.max(1),
            query: ListQuery::default(),
            mount: MountGuard::new(),
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Replace the whole query without loading. Page size stays as built.
    pub fn set_query(&mut self, query: ListQuery) {
        self.query = query;
    }

    /// Guard for this screen; unmounting it discards in-flight loads.
    pub fn mount_guard(&self) -> MountGuard {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Filter by `text` (empty shows everything) and go to the first page.
    pub async fn search(&mut self, text: &str) -> MoodlogResult<Option<Page<DiarySummary>>> {
        self.query = ListQuery {
            search: text.to_string(),
            date: None,
            page: 0,
        };
        self.load().await
    }

    /// Show one day's entries and go to the first page.
    pub async fn select_date(&mut self, date: NaiveDate) -> MoodlogResult<Option<Page<DiarySummary>>> {
        self.query = ListQuery {
            search: String::new(),
            date: Some(date),
            page: 0,
        };
        self.load().await
    }

    /// Leave date mode and show the full list.
    pub async fn clear_date(&mut self) -> MoodlogResult<Option<Page<DiarySummary>>> {
        self.query.date = None;
        self.query.page = 0;
        self.load().await
    }

    pub async fn go_to_page(&mut self, page: usize) -> MoodlogResult<Option<Page<DiarySummary>>> {
        self.query.page = page;
        self.load().await
    }

    /// Load the page described by the current query.
    ///
    /// `Ok(None)` means the screen was unmounted before the data arrived.
    pub async fn load(&self) -> MoodlogResult<Option<Page<DiarySummary>>> {
        let user = self.session.require_identity()?;
        let entries = match self.query.date {
            Some(date) => self.diary.list_range(&user.id, date, date).await?,
            None => {
                let all = self.diary.list(&user.id).await?;
                filter_entries(all, &self.query.search)
            }
        };
        debug!(count = entries.len(), page = self.query.page, "Diary list loaded");

        let page = Page::slice(entries, self.query.page, self.page_size)
            .map(|entry| DiarySummary::from(&entry));
        Ok(self.mount.keep(page))
    }

    /// Dates in the month of `year`/`month` that have at least one entry.
    pub async fn calendar_marks(
        &self,
        year: i32,
        month: u32,
    ) -> MoodlogResult<Option<BTreeSet<NaiveDate>>> {
        let user = self.session.require_identity()?;
        let (first, last) = month_bounds(year, month).ok_or_else(|| {
            ValidationError::Incomplete(format!("{}-{:02} is not a valid month.", year, month))
        })?;

        let entries = self.diary.list_range(&user.id, first, last).await?;
        let marks = entries.iter().filter_map(DiaryEntry::created_date).collect();
        Ok(self.mount.keep(marks))
    }
}

/// Keep entries whose title or content contains `search`.
fn filter_entries(entries: Vec<DiaryEntry>, search: &str) -> Vec<DiaryEntry> {
    if search.is_empty() {
        return entries;
    }
    entries.into_iter().filter(|e| e.matches(search)).collect()
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month.pred_opt()?))
}
