//! Fixed-size paging over a slice.
//!
//! The paginator only stores the page number and size; the collection is
//! passed in on every read so the window always tracks the current data.

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, page_size: page_size.max(1) }
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Items of the current page; empty when the page is past the end.
    pub fn page_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn next_page(&mut self, len: usize) {
        if self.page < self.total_pages(len) {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Pull the page back inside `1..=max(1, total_pages)`.
    pub fn clamp(&mut self, len: usize) {
        self.page = self.page.min(self.total_pages(len).max(1));
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}
