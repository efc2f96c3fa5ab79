//! Page cursor and merge strategy shared by every paginated list.

/// Pagination position plus a "more data available" flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub has_next_page: bool,
}

impl PageCursor {
    /// Cursor before anything has been fetched.
    pub const fn first() -> Self {
        Self { page: 1, has_next_page: false }
    }

    /// Cursor after fetching `page` and receiving `received` items.
    ///
    /// Only a full page means there may be more; a short or empty page ends the list.
    pub fn after_fetch(page: u32, received: usize, page_size: u32) -> Self {
        let has_next_page = received > 0 && received >= page_size as usize;
        Self { page: page.max(1), has_next_page }
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

/// Combine a freshly fetched page with the items already shown.
///
/// Page 1 replaces everything (new search or a different owner). Later pages append in
/// order; overlapping pages from the API are kept as-is.
pub fn merge<T: Clone>(existing: &[T], incoming: Vec<T>, page: u32) -> Vec<T> {
    if page <= 1 {
        return incoming;
    }
    let mut out = Vec::with_capacity(existing.len() + incoming.len());
    out.extend_from_slice(existing);
    out.extend(incoming);
    out
}
