/// Client-side page state of one list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(per_page: u32) -> Self {
        Self {
            current_page: 1,
            per_page: per_page.max(1),
            total_pages: 1,
        }
    }

    /// `ceil(total_items / per_page)`.
    pub fn total_pages_for(total_items: u64, per_page: u32) -> u32 {
        let per_page = u64::from(per_page.max(1));
        let pages = total_items.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest page that may be requested. Page 1 stays loadable for empty lists.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.last_page()).contains(&page)
    }

    /// Returns the page to fetch, or `None` when `page` is outside `[1, total_pages]`.
    pub fn request(&self, page: u32) -> Option<u32> {
        self.contains(page).then_some(page)
    }

    pub fn next(&self) -> Option<u32> {
        self.request(self.current_page.saturating_add(1))
    }

    pub fn prev(&self) -> Option<u32> {
        self.request(self.current_page.saturating_sub(1))
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Nearest requestable page to `page`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page())
    }

    /// Adopts the totals reported with a freshly loaded page.
    ///
    /// `current_page` is kept inside `[1, last_page]` even when the list has
    /// shrunk below the page that was just shown.
    pub fn apply_response(&mut self, page: u32, pages: Option<u32>, total: Option<u64>) {
        self.total_pages = match (pages, total) {
            (Some(pages), _) => pages,
            (None, Some(total)) => Self::total_pages_for(total, self.per_page),
            (None, None) => self.total_pages.max(page),
        };
        self.current_page = self.clamp(page);
    }
}
