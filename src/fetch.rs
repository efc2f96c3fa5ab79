//! Fetch orchestration for one paginated list.
//!
//! [`PagedLoader`] does not perform I/O. It hands out a [`Ticket`] for every page request,
//! and the caller runs the request and feeds the result back through
//! [`PagedLoader::finish`]. Every ticket carries a token; only the most recently issued
//! token is accepted, so a slow page-1 response can never overwrite a newer load.

use crate::error::FetchError;
use crate::paging::{PageCursor, merge};

/// Identifies one outstanding page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub token: u64,
    /// Login for repository lists, query text for the user search.
    pub key: String,
    pub page: u32,
    pub page_size: u32,
}

/// What happened to a finished request.
#[derive(Debug, PartialEq)]
pub enum LoadOutcome<T> {
    /// The page was merged; `items` is the full list to show next.
    Applied { items: Vec<T>, cursor: PageCursor },
    /// A newer request (or a reset) superseded this one; nothing changed.
    Stale,
    /// The request failed; the previous items and cursor are kept.
    Failed(FetchError),
}

#[derive(Clone, Debug)]
pub struct PagedLoader<T> {
    key: String,
    page_size: u32,
    items: Vec<T>,
    cursor: PageCursor,
    is_loading: bool,
    next_token: u64,
    current: Option<u64>,
}

impl<T: Clone> PagedLoader<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            key: String::new(),
            page_size: page_size.max(1),
            items: Vec::new(),
            cursor: PageCursor::first(),
            is_loading: false,
            next_token: 0,
            current: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Request `page` for `key`. Page 1 means "start over" for a (possibly new) key.
    pub fn begin(&mut self, key: &str, page: u32) -> Ticket {
        let page = page.max(1);
        self.next_token += 1;
        self.current = Some(self.next_token);
        self.key = key.to_string();
        self.is_loading = true;
        tracing::debug!(key, page, token = self.next_token, "page requested");
        Ticket { token: self.next_token, key: self.key.clone(), page, page_size: self.page_size }
    }

    /// Request the page after the cursor, if the last page was full and nothing is in flight.
    pub fn load_more(&mut self) -> Option<Ticket> {
        if self.is_loading || !self.cursor.has_next_page {
            return None;
        }
        let key = self.key.clone();
        Some(self.begin(&key, self.cursor.next_page()))
    }

    pub fn finish(&mut self, ticket: &Ticket, result: Result<Vec<T>, FetchError>) -> LoadOutcome<T> {
        if self.current != Some(ticket.token) {
            tracing::debug!(key = %ticket.key, page = ticket.page, token = ticket.token, "dropping stale response");
            return LoadOutcome::Stale;
        }
        self.current = None;
        self.is_loading = false;

        match result {
            Ok(incoming) => {
                let cursor = PageCursor::after_fetch(ticket.page, incoming.len(), ticket.page_size);
                self.items = merge(&self.items, incoming, ticket.page);
                self.cursor = cursor;
                LoadOutcome::Applied { items: self.items.clone(), cursor }
            }
            Err(err) => {
                tracing::warn!(key = %ticket.key, page = ticket.page, error = %err, "page fetch failed");
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Drop everything and invalidate outstanding tickets. In-flight requests still run,
    /// but their responses will come back `Stale`.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = PageCursor::first();
        self.is_loading = false;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(range: std::ops::Range<u32>) -> Vec<u32> {
        range.collect()
    }

    #[test]
    fn first_page_then_load_more_appends() {
        let mut loader = PagedLoader::new(10);
        let t1 = loader.begin("octocat", 1);
        assert!(loader.is_loading());
        let out = loader.finish(&t1, Ok(page(0..10)));
        assert!(matches!(out, LoadOutcome::Applied { ref items, cursor } if items.len() == 10 && cursor.has_next_page));

        let t2 = loader.load_more().expect("full page allows more");
        assert_eq!(t2.page, 2);
        assert_eq!(t2.key, "octocat");
        loader.finish(&t2, Ok(page(10..14)));
        assert_eq!(loader.items(), page(0..14).as_slice());
        assert_eq!(loader.cursor(), PageCursor { page: 2, has_next_page: false });
        assert!(loader.load_more().is_none());
    }

    #[test]
    fn no_load_more_while_loading() {
        let mut loader = PagedLoader::<u32>::new(2);
        let t = loader.begin("k", 1);
        assert!(loader.load_more().is_none());
        loader.finish(&t, Ok(vec![1, 2]));
        assert!(loader.load_more().is_some());
    }

    #[test]
    fn failure_keeps_previous_state() {
        let mut loader = PagedLoader::new(2);
        let t = loader.begin("k", 1);
        loader.finish(&t, Ok(vec![1, 2]));
        let t = loader.load_more().unwrap();
        let out = loader.finish(&t, Err(FetchError::Network("down".into())));
        assert!(matches!(out, LoadOutcome::Failed(_)));
        assert!(!loader.is_loading());
        assert_eq!(loader.items(), &[1, 2]);
        assert_eq!(loader.cursor(), PageCursor { page: 1, has_next_page: true });
    }

    #[test]
    fn older_ticket_is_dropped() {
        let mut loader = PagedLoader::new(10);
        let slow = loader.begin("a", 1);
        let fast = loader.begin("b", 1);
        loader.finish(&fast, Ok(vec![1]));
        assert_eq!(loader.finish(&slow, Ok(vec![9, 9, 9])), LoadOutcome::Stale);
        assert_eq!(loader.items(), &[1]);
        assert_eq!(loader.key(), "b");
    }

    #[test]
    fn reset_invalidates_in_flight_ticket() {
        let mut loader = PagedLoader::new(10);
        let t = loader.begin("a", 1);
        loader.reset();
        assert!(!loader.is_loading());
        assert_eq!(loader.finish(&t, Ok(vec![1, 2])), LoadOutcome::Stale);
        assert!(loader.items().is_empty());
    }

    #[test]
    fn page_one_replaces_previous_owner_items() {
        let mut loader = PagedLoader::new(3);
        let t = loader.begin("a", 1);
        loader.finish(&t, Ok(vec![1, 2, 3]));
        let t = loader.begin("b", 1);
        loader.finish(&t, Ok(vec![7]));
        assert_eq!(loader.items(), &[7]);
    }
}
