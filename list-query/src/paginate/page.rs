//! Paginated result envelope.

/// Page metadata, one variant per pagination mode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageInfo {
    /// Offset mode: page-number bookkeeping plus the total matching-row
    /// count.
    Offset {
        /// 1-indexed page number served.
        page: u32,
        /// Effective page size after defaults and caps.
        page_size: u32,
        /// Total matching rows, from the executor's count.
        total: u64,
    },
    /// Cursor mode: opaque continuation tokens.
    Cursor {
        /// Token for the next page; absent at end-of-data.
        next_cursor: Option<String>,
        /// Token for the previous page; absent on the first page.
        prev_cursor: Option<String>,
    },
}

/// A page of rows plus its metadata - the uniform envelope every list
/// operation returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    /// The rows of this page, in resolved sort order.
    pub items: Vec<T>,
    /// Mode-specific page metadata.
    pub page_info: PageInfo,
}

impl<T> Paginated<T> {
    /// Whether more rows follow this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match &self.page_info {
            PageInfo::Offset {
                page,
                page_size,
                total,
            } => u64::from(*page) * u64::from(*page_size) < *total,
            PageInfo::Cursor { next_cursor, .. } => next_cursor.is_some(),
        }
    }

    /// Map the items while keeping the page metadata, for shaping rows
    /// into transport types.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}
