//! Paginated reveal controller: a [`PagedLoader`] whose accepted pages are shown through a
//! [`TransitionSequencer`].
//!
//! The same controller drives the top-level user list and each user's repository list.

use std::time::Instant;

use crate::error::FetchError;
use crate::fetch::{LoadOutcome, PagedLoader, Ticket};
use crate::paging::PageCursor;
use crate::transition::{TransitionConfig, TransitionRequest, TransitionSequencer};

/// What a revealed container shows.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealContent<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
    /// Hidden containers take no rows at all.
    pub active: bool,
}

impl<T> RevealContent<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new(), cursor: PageCursor::first(), active: false }
    }
}

impl<T> Default for RevealContent<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug)]
pub struct PaginatedReveal<T> {
    loader: PagedLoader<T>,
    sequencer: TransitionSequencer<RevealContent<T>>,
    /// Item count and visibility once every queued transition has run.
    target_len: usize,
    target_active: bool,
}

impl<T: Clone> PaginatedReveal<T> {
    pub fn new(page_size: u32, config: TransitionConfig) -> Self {
        Self {
            loader: PagedLoader::new(page_size),
            sequencer: TransitionSequencer::new(RevealContent::empty(), config),
            target_len: 0,
            target_active: false,
        }
    }

    /// Start over for `key` at page 1. The container becomes visible right away so the
    /// loading header shows while the request runs; a collapse still running finishes
    /// first and the container reopens behind it.
    pub fn load_first(&mut self, key: &str) -> Ticket {
        if self.sequencer.is_idle() {
            self.sequencer.content_mut().active = true;
        } else if !self.target_active {
            self.sequencer.request(TransitionRequest::Reveal(RevealContent {
                items: Vec::new(),
                cursor: PageCursor::first(),
                active: true,
            }));
        }
        self.target_active = true;
        self.target_len = 0;
        self.loader.begin(key, 1)
    }

    pub fn load_more(&mut self) -> Option<Ticket> {
        self.loader.load_more()
    }

    /// Feed a finished request back. Applied pages are queued as a reveal; later pages
    /// only stagger in the rows that were not shown yet.
    pub fn finish(&mut self, ticket: &Ticket, result: Result<Vec<T>, FetchError>) -> LoadOutcome<T> {
        let outcome = self.loader.finish(ticket, result);
        if let LoadOutcome::Applied { items, cursor } = &outcome {
            let next = RevealContent { items: items.clone(), cursor: *cursor, active: true };
            let kept = if ticket.page > 1 { self.target_len.min(items.len()) } else { 0 };
            self.sequencer.request(if kept > 0 {
                TransitionRequest::Append { next, kept }
            } else {
                TransitionRequest::Reveal(next)
            });
            self.target_len = items.len();
            self.target_active = true;
        }
        outcome
    }

    /// Forget the list and animate the container shut. Responses still in flight are
    /// ignored when they arrive.
    pub fn collapse(&mut self) {
        self.loader.reset();
        self.target_len = 0;
        self.target_active = false;
        let content = self.sequencer.content();
        if self.sequencer.is_idle() && !content.active && content.items.is_empty() {
            return;
        }
        self.sequencer.request(TransitionRequest::Collapse(RevealContent::empty()));
    }

    pub fn advance<F>(&mut self, now: Instant, measure: F) -> bool
    where
        F: Fn(&RevealContent<T>) -> u16,
    {
        self.sequencer.advance(now, measure)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Cursor of the latest accepted page (may be ahead of what is on screen).
    pub fn cursor(&self) -> PageCursor {
        self.loader.cursor()
    }

    pub fn key(&self) -> &str {
        self.loader.key()
    }

    /// Items of the latest accepted page set.
    pub fn items(&self) -> &[T] {
        self.loader.items()
    }

    /// What is on screen right now.
    pub fn displayed(&self) -> &RevealContent<T> {
        self.sequencer.content()
    }

    pub fn sequencer(&self) -> &TransitionSequencer<RevealContent<T>> {
        &self.sequencer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn measure(c: &RevealContent<u32>) -> u16 {
        if c.active { 1 + c.items.len() as u16 } else { 0 }
    }

    fn settle(r: &mut PaginatedReveal<u32>, mut now: Instant) -> Instant {
        for _ in 0..10 {
            r.advance(now, measure);
            now += Duration::from_millis(450);
        }
        now
    }

    #[test]
    fn applied_page_reaches_screen_after_transition() {
        let mut r = PaginatedReveal::new(2, TransitionConfig::default());
        let t = r.load_first("octocat");
        assert!(r.displayed().active);
        assert!(r.is_loading());

        r.finish(&t, Ok(vec![1, 2]));
        assert!(r.displayed().items.is_empty());
        settle(&mut r, Instant::now());
        assert_eq!(r.displayed().items, vec![1, 2]);
        assert!(r.displayed().cursor.has_next_page);
    }

    #[test]
    fn collapse_hides_and_drops_late_response() {
        let mut r = PaginatedReveal::new(2, TransitionConfig::default());
        let t = r.load_first("a");
        r.finish(&t, Ok(vec![1, 2]));
        let now = settle(&mut r, Instant::now());

        let late = r.load_more().unwrap();
        r.collapse();
        assert!(matches!(r.finish(&late, Ok(vec![3])), LoadOutcome::Stale));
        settle(&mut r, now);
        assert_eq!(r.displayed(), &RevealContent::empty());
        assert!(r.items().is_empty());
    }

    #[test]
    fn collapse_of_untouched_container_is_a_no_op() {
        let mut r = PaginatedReveal::<u32>::new(2, TransitionConfig::default());
        r.collapse();
        assert!(r.sequencer().is_idle());
    }

    #[test]
    fn reselect_while_collapsing_reopens_after_collapse() {
        let mut r = PaginatedReveal::new(2, TransitionConfig::default());
        let t = r.load_first("a");
        r.finish(&t, Ok(vec![1, 2]));
        let now = settle(&mut r, Instant::now());

        r.collapse();
        r.advance(now, measure);
        assert!(!r.sequencer().is_idle());
        let t = r.load_first("a");
        let now = settle(&mut r, now + Duration::from_millis(450));
        assert!(r.displayed().active);
        assert!(r.displayed().items.is_empty());
        assert!(r.is_loading());

        r.finish(&t, Ok(vec![7]));
        settle(&mut r, now);
        assert_eq!(r.displayed().items, vec![7]);
    }

    #[test]
    fn next_page_keeps_shown_items_visible() {
        let mut r = PaginatedReveal::new(2, TransitionConfig::default());
        let t = r.load_first("a");
        r.finish(&t, Ok(vec![1, 2]));
        let now = settle(&mut r, Instant::now());

        let more = r.load_more().unwrap();
        r.finish(&more, Ok(vec![3]));
        r.advance(now, measure);
        let committed = now + Duration::from_millis(16);
        r.advance(committed, measure);
        assert_eq!(r.displayed().items, vec![1, 2, 3]);
        assert_eq!(r.sequencer().item_visibility(0, committed), 1.0);
        assert_eq!(r.sequencer().item_visibility(1, committed), 1.0);
        assert!(r.sequencer().item_visibility(2, committed) < 1.0);
    }
}
