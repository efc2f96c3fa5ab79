//! Selection state shared by the user list and the per-user repository lists.
//!
//! Owned by [`AppState`](crate::app::AppState); every mutation goes through a setter.

use crate::github::{User, UserId};

/// Result of toggling a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// `current` is now selected; `previous` (if any) lost the selection.
    Selected { previous: Option<UserId>, current: UserId },
    /// The selected user was toggled off.
    Cleared { previous: UserId },
    /// The id is not part of the current results.
    Unknown,
}

#[derive(Clone, Debug, Default)]
pub struct SearchStore {
    users: Vec<User>,
    total_count: u64,
    selected: Option<UserId>,
    is_loading: bool,
}

impl SearchStore {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn selected(&self) -> Option<UserId> {
        self.selected
    }

    pub fn selected_user(&self) -> Option<&User> {
        let id = self.selected?;
        self.users.iter().find(|u| u.id == id)
    }

    pub fn is_selected(&self, id: UserId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Store a merged result list. A fresh search (page 1) also drops the selection.
    pub fn set_results(&mut self, users: Vec<User>, total_count: u64, page: u32) {
        self.users = users;
        self.total_count = total_count;
        if page <= 1 {
            self.selected = None;
        } else if let Some(id) = self.selected {
            if !self.users.iter().any(|u| u.id == id) {
                self.selected = None;
            }
        }
    }

    /// Select `id`, or clear the selection if it is already selected.
    pub fn toggle_selected(&mut self, id: UserId) -> SelectionChange {
        if !self.users.iter().any(|u| u.id == id) {
            return SelectionChange::Unknown;
        }
        match self.selected {
            Some(current) if current == id => {
                self.selected = None;
                SelectionChange::Cleared { previous: id }
            }
            previous => {
                self.selected = Some(id);
                SelectionChange::Selected { previous, current: id }
            }
        }
    }

    pub fn clear_selection(&mut self) -> Option<UserId> {
        self.selected.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::AccountKind;

    fn user(id: UserId, login: &str) -> User {
        User {
            id,
            login: login.to_string(),
            avatar_url: String::new(),
            html_url: format!("https://github.com/{login}"),
            kind: AccountKind::User,
            score: None,
        }
    }

    #[test]
    fn toggle_twice_returns_to_none() {
        let mut store = SearchStore::default();
        store.set_results(vec![user(1, "a"), user(2, "b")], 2, 1);

        assert_eq!(store.toggle_selected(1), SelectionChange::Selected { previous: None, current: 1 });
        assert_eq!(store.toggle_selected(1), SelectionChange::Cleared { previous: 1 });
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn selecting_another_reports_previous() {
        let mut store = SearchStore::default();
        store.set_results(vec![user(1, "a"), user(2, "b")], 2, 1);
        store.toggle_selected(1);
        assert_eq!(store.toggle_selected(2), SelectionChange::Selected { previous: Some(1), current: 2 });
        assert_eq!(store.selected_user().map(|u| u.login.as_str()), Some("b"));
    }

    #[test]
    fn new_search_clears_selection_but_next_page_keeps_it() {
        let mut store = SearchStore::default();
        store.set_results(vec![user(1, "a")], 9, 1);
        store.toggle_selected(1);
        store.set_results(vec![user(1, "a"), user(2, "b")], 9, 2);
        assert_eq!(store.selected(), Some(1));
        store.set_results(vec![user(3, "c")], 1, 1);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut store = SearchStore::default();
        assert_eq!(store.toggle_selected(42), SelectionChange::Unknown);
        assert_eq!(store.selected(), None);
    }
}
