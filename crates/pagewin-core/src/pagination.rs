//! Page window arithmetic and navigation.
//!
//! The free functions map `(page number, page size, source size)` to window
//! bounds and page counts. They never clamp: a page outside
//! `[1, total_pages]` is the caller's problem, and [`is_valid_page`] is the
//! check to run first. [`Paginator`] is the caller-side policy that does
//! clamp, the way a pagination control bar would.

/// Rows per page offered to users by default.
pub const PAGE_SIZE_CHOICES: [usize; 9] = [10, 20, 30, 50, 100, 200, 300, 500, 1000];

/// Half-open range `[start, end)` of source positions covered by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: usize,
    pub end: usize,
}

impl WindowBounds {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end
    }

    /// Same start, end clamped to a (possibly shrunk) source size.
    pub fn clamped_to(&self, source_size: usize) -> Self {
        Self::new(self.start.min(source_size), self.end.min(source_size))
    }
}

/// Number of pages needed for `source_size` rows, never less than one.
pub fn total_pages(page_size: usize, source_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    source_size.div_ceil(page_size).max(1)
}

/// Source positions covered by a 1-based page number.
pub fn bounds(page_number: usize, page_size: usize, source_size: usize) -> WindowBounds {
    let start = page_number.saturating_sub(1).saturating_mul(page_size);
    let end = page_number.saturating_mul(page_size).min(source_size);
    WindowBounds::new(start.min(source_size), end)
}

pub fn is_valid_page(page_number: usize, page_size: usize, source_size: usize) -> bool {
    page_number >= 1 && page_number <= total_pages(page_size, source_size)
}

/// Navigation state for a paged table: the current page and rows per page.
///
/// Every movement clamps into `[1, last_page]`, so the resulting page can be
/// handed straight to the engine.
#[derive(Debug, Clone)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn clamp(requested: usize, last_page: usize) -> usize {
        requested.clamp(1, last_page.max(1))
    }

    /// Move to `page`, clamped. Returns the page actually selected.
    pub fn go_to(&mut self, page: usize, last_page: usize) -> usize {
        self.current_page = Self::clamp(page, last_page);
        self.current_page
    }

    pub fn first(&mut self, last_page: usize) -> usize {
        self.go_to(1, last_page)
    }

    pub fn previous(&mut self, last_page: usize) -> usize {
        self.go_to(self.current_page.saturating_sub(1), last_page)
    }

    pub fn next(&mut self, last_page: usize) -> usize {
        self.go_to(self.current_page.saturating_add(1), last_page)
    }

    pub fn last(&mut self, last_page: usize) -> usize {
        self.go_to(last_page, last_page)
    }

    /// Change rows per page; a change sends the paginator back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.current_page = 1;
        true
    }

    /// Page number typed by a user: the leading digits of the trimmed text.
    /// Anything unparseable keeps the current page.
    pub fn parse_go_to(&self, text: &str) -> usize {
        let digits: String = text
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(self.current_page)
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self, last_page: usize) -> bool {
        self.current_page == last_page
    }

    pub fn label(&self, last_page: usize) -> String {
        format!("{} / {}", self.current_page, last_page)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE_CHOICES[0])
    }
}
