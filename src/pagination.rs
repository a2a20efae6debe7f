//! This modules defines the common functionality for paging data.

/// The number of pages needed to show `count` items, `page_size` at a time.
///
/// An empty list has zero pages, as does a page size of zero.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }

    count.div_ceil(page_size)
}

/// The items on the 1-based page `page`.
///
/// Pages past the end of `items` are empty, and page 0 is treated like page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    &items[start..end]
}

/// The current page of a paged list.
///
/// The page size is fixed when the cursor is created. The current page is
/// 1-based and is kept within `[1, max(total_pages, 1)]` by [Pagination::next],
/// [Pagination::prev] and [Pagination::clamp].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// The number of items per page when none is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 5;

    /// Create a cursor on the first page. A page size of zero is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// The 1-based page number.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The maximum number of items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go back to the first page.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Go to the next page, staying put on the last page.
    pub fn next(&mut self, total_pages: usize) {
        if self.current_page < total_pages {
            self.current_page += 1;
        }
    }

    /// Go to the previous page, staying put on the first page.
    pub fn prev(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Pull the current page back in range after the number of pages changed.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Pagination, paginate, total_pages};

    #[test]
    fn twelve_items_make_three_pages() {
        let items: Vec<usize> = (0..12).collect();

        assert_eq!(total_pages(items.len(), 5), 3);
        assert_eq!(paginate(&items, 1, 5), &[0, 1, 2, 3, 4]);
        assert_eq!(paginate(&items, 3, 5), &[10, 11]);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let items: Vec<usize> = Vec::new();

        assert_eq!(total_pages(0, 5), 0);
        assert!(paginate(&items, 1, 5).is_empty());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let items: Vec<usize> = (0..12).collect();

        assert!(paginate(&items, 4, 5).is_empty());
        assert!(paginate(&items, usize::MAX, 5).is_empty());
    }

    #[test]
    fn page_lengths_and_concatenation() {
        for count in 0..=23 {
            let items: Vec<usize> = (0..count).collect();

            for size in 1..=7 {
                let pages = total_pages(count, size);
                let mut joined = Vec::new();

                for page in 1..=pages + 1 {
                    let slice = paginate(&items, page, size);
                    let want_len = size.min(count.saturating_sub((page - 1) * size));
                    assert_eq!(slice.len(), want_len, "count {count}, size {size}, page {page}");
                    joined.extend_from_slice(slice);
                }

                assert_eq!(joined, items, "count {count}, size {size}");
            }
        }
    }

    #[test]
    fn next_stays_on_last_page() {
        let mut pagination = Pagination::new(5);

        pagination.next(3);
        pagination.next(3);
        pagination.next(3);

        assert_eq!(pagination.current_page(), 3);
    }

    #[test]
    fn prev_stays_on_first_page() {
        let mut pagination = Pagination::new(5);

        pagination.prev();

        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn next_without_pages_is_a_no_op() {
        let mut pagination = Pagination::new(5);

        pagination.next(0);

        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn clamp_pulls_page_back_in_range() {
        let mut pagination = Pagination::new(5);
        pagination.next(4);
        pagination.next(4);
        pagination.next(4);

        pagination.clamp(2);
        assert_eq!(pagination.current_page(), 2);

        pagination.clamp(0);
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        assert_eq!(Pagination::new(0).page_size(), 1);
    }
}
