//! Transient, dismissable notifications.

use std::time::{Duration, Instant};

/// Every toast reports a failed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub expires_at: Instant,
}

#[derive(Clone, Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self { items: Vec::new(), ttl }
    }

    pub fn error(&mut self, title: &str, description: &str, now: Instant) {
        self.items.push(Toast {
            title: title.to_string(),
            description: description.to_string(),
            expires_at: now + self.ttl,
        });
    }

    /// Newest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter().rev()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn dismiss_latest(&mut self) -> Option<Toast> {
        self.items.pop()
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| t.expires_at > now);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
