//! Client-side paging over a fully loaded list.

/// One page of a list plus the numbers needed to draw a pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Slice page `page` out of `all`. Out-of-range pages come back empty.
    pub fn slice(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_count = all.len();
        let items = all
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self {
            items,
            page,
            page_size,
            total_count,
        }
    }

    /// At least one, so an empty list still shows "1 / 1".
    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}
