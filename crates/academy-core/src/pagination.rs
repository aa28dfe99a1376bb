use serde::Serialize;

/// Visible window of a paginated list, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    /// First item shown, 0 when the page is empty.
    pub from: u64,
    /// Last item shown, 0 when the page is empty.
    pub to: u64,
    /// Always at least 1.
    pub total_pages: u64,
}

impl PageWindow {
    pub fn compute(page: u32, limit: u32, total: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let size = u64::from(limit);
        let total_pages = total.div_ceil(size).max(1);
        let start = (u64::from(page) - 1) * size;

        let (from, to) = if start >= total {
            (0, 0)
        } else {
            (start + 1, (start + size).min(total))
        };

        Self {
            page,
            limit,
            total,
            from,
            to,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let window = PageWindow::compute(2, 10, 25);
        assert_eq!(window.from, 11);
        assert_eq!(window.to, 20);
        assert_eq!(window.total_pages, 3);
        assert!(window.has_previous());
        assert!(window.has_next());
    }

    #[test]
    fn test_last_partial_page() {
        let window = PageWindow::compute(3, 10, 25);
        assert_eq!((window.from, window.to), (21, 25));
        assert!(!window.has_next());
    }

    #[test]
    fn test_empty_list() {
        let window = PageWindow::compute(1, 20, 0);
        assert_eq!((window.from, window.to), (0, 0));
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_page_past_end() {
        let window = PageWindow::compute(9, 10, 25);
        assert_eq!((window.from, window.to), (0, 0));
        assert_eq!(window.total_pages, 3);
    }
}
