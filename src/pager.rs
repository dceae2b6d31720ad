//! Pager
//!
//! Page bookkeeping for remotely paginated lists. Navigation yields the
//! single row range the caller should fetch next.

/// Inclusive row range sent as `Range: from-to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub from: u64,
    pub to: u64,
}

impl RowRange {
    pub fn for_page(page: u32, page_size: u32) -> Self {
        let page = page.max(1) as u64;
        let size = page_size.max(1) as u64;
        Self {
            from: (page - 1) * size,
            to: page * size - 1,
        }
    }
}

/// One entry of the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Ellipsis,
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let size = page_size.max(1) as u64;
    (total_count.div_ceil(size) as u32).max(1)
}

/// Compact page list with ellipses for long ranges
pub fn labels(current: u32, total: u32) -> Vec<PageLabel> {
    use PageLabel::{Ellipsis, Page};

    if total <= 5 {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total)]
    } else if current >= total - 2 {
        let mut out = vec![Page(1), Ellipsis];
        out.extend((total - 3..=total).map(Page));
        out
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page_index: u32,
    page_size: u32,
    total_count: u64,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 1,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.page_index
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// Record the count from the latest fetch and re-clamp the page
    pub fn set_total(&mut self, total_count: u64) {
        self.total_count = total_count;
        self.page_index = self.page_index.clamp(1, self.total_pages());
    }

    /// Move to `page`. Out-of-range or same-page requests change nothing.
    pub fn navigate(&mut self, page: u32) -> Option<RowRange> {
        if page < 1 || page > self.total_pages() || page == self.page_index {
            return None;
        }
        self.page_index = page;
        Some(self.current_range())
    }

    /// Back to page 1 without a bounds check (new sort or filter)
    pub fn reset(&mut self) -> RowRange {
        self.page_index = 1;
        self.current_range()
    }

    pub fn current_range(&self) -> RowRange {
        RowRange::for_page(self.page_index, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages()
    }

    /// The bar is hidden for a single page
    pub fn is_visible(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn labels(&self) -> Vec<PageLabel> {
        labels(self.page_index, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::PageLabel::{Ellipsis, Page};
    use super::*;

    #[test]
    fn test_empty_collection_has_one_page() {
        let mut state = PageState::new(10);
        state.set_total(0);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.current(), 1);
        assert!(!state.is_visible());
        for page in [0, 1, 2, 50] {
            assert_eq!(state.navigate(page), None);
        }
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_forty_seven_rows() {
        assert_eq!(total_pages(47, 10), 5);
        assert_eq!(labels(3, 5), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn test_middle_of_long_range() {
        assert_eq!(total_pages(200, 10), 20);
        assert_eq!(
            labels(10, 20),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_labels_near_edges() {
        assert_eq!(labels(2, 20), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(20)]);
        assert_eq!(
            labels(19, 20),
            vec![Page(1), Ellipsis, Page(17), Page(18), Page(19), Page(20)]
        );
        assert_eq!(labels(1, 1), vec![Page(1)]);
    }

    #[test]
    fn test_navigate_yields_one_range() {
        let mut state = PageState::new(10);
        state.set_total(47);
        assert_eq!(state.navigate(3), Some(RowRange { from: 20, to: 29 }));
        assert_eq!(state.current(), 3);
        // same page is a no-op
        assert_eq!(state.navigate(3), None);
        assert_eq!(state.navigate(6), None);
        assert_eq!(state.current(), 3);
        assert!(state.has_prev());
        assert!(state.has_next());
    }

    #[test]
    fn test_shrinking_total_clamps_page() {
        let mut state = PageState::new(10);
        state.set_total(200);
        state.navigate(20);
        state.set_total(15);
        assert_eq!(state.current(), 2);
        assert!(!state.has_next());
    }

    #[test]
    fn test_reset_returns_first_range() {
        let mut state = PageState::new(10);
        state.set_total(30);
        state.navigate(2);
        assert_eq!(state.reset(), RowRange { from: 0, to: 9 });
        assert_eq!(state.current(), 1);
    }
}
