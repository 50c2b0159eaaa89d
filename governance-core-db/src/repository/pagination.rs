/// Offset-based page request used by list queries
///
/// # Example
/// ```
/// use governance_core_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::new(20, 0);
/// let second = PageRequest::new(20, 20);
/// assert_eq!(second.page_number(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Page request for a 1-based page number
    ///
    /// # Example
    /// ```
    /// use governance_core_db::repository::pagination::PageRequest;
    ///
    /// assert_eq!(PageRequest::for_page(20, 1).offset, 0);
    /// assert_eq!(PageRequest::for_page(20, 3).offset, 40);
    /// ```
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        let page_number = page_number.max(1);
        Self {
            limit: page_size,
            offset: (page_number - 1) * page_size,
        }
    }

    /// Page number (1-based) for this request
    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }

    /// `limit` and `offset` as SQL bind values
    pub fn as_sql_bounds(&self) -> (i64, i64) {
        (
            i64::try_from(self.limit).unwrap_or(i64::MAX),
            i64::try_from(self.offset).unwrap_or(i64::MAX),
        )
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

/// One page of results plus the total count across all pages
///
/// # Example
/// ```
/// use governance_core_db::repository::pagination::{Page, PageRequest};
///
/// let page = Page::from_items((1..=45).collect(), PageRequest::new(20, 40));
/// assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
/// assert_eq!(page.total_pages(), 3);
/// assert!(page.is_last_page());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Cuts the requested window out of a fully materialized result set.
    pub fn from_items(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        Self::new(items, total, request.limit, request.offset)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    pub fn page_number(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            (self.offset / self.limit) + 1
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.offset == 0
    }

    pub fn is_last_page(&self) -> bool {
        !self.has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_past_the_end() {
        let page: Page<i32> = Page::from_items(vec![1, 2, 3], PageRequest::new(10, 5));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::from_items(vec![1, 2, 3], PageRequest::new(2, 0)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 3);
        assert!(page.has_more());
        assert_eq!(PageRequest::new(2, 4).as_sql_bounds(), (2, 4));
    }
}
