//! State transitions driven by keys and by finished fetches.
//!
//! Methods here never perform I/O. Anything that needs the network comes back as a
//! [`Command`] for the dispatcher; results come in later through [`AppState::apply_event`].

use std::collections::HashMap;
use std::time::Instant;

use crate::app::dispatch::{AppEvent, Command};
use crate::app::{AppState, InputMode};
use crate::fetch::LoadOutcome;
use crate::github::{Repository, User, UserId};
use crate::reveal::{PaginatedReveal, RevealContent};
use crate::store::SelectionChange;

/// Lines per repository card: title row, description, URL.
pub const REPO_CARD_ROWS: u16 = 3;

/// Natural height of a repository panel: summary line, cards, and a "load more" row.
pub fn repo_panel_rows(content: &RevealContent<Repository>) -> u16 {
    if !content.active {
        return 0;
    }
    let cards = u16::try_from(content.items.len())
        .unwrap_or(u16::MAX)
        .saturating_mul(REPO_CARD_ROWS);
    let more = u16::from(content.cursor.has_next_page);
    1u16.saturating_add(cards).saturating_add(more)
}

/// Rows a panel takes on screen this frame.
pub fn panel_height(panel: &PaginatedReveal<Repository>) -> u16 {
    panel.sequencer().visible_height(repo_panel_rows(panel.displayed()))
}

/// Natural height of the user list: one row per user plus its open panel, or a single
/// placeholder row.
pub fn user_list_rows(
    content: &RevealContent<User>,
    repos: &HashMap<UserId, PaginatedReveal<Repository>>,
) -> u16 {
    if !content.active {
        return 0;
    }
    if content.items.is_empty() {
        return 1;
    }
    content.items.iter().fold(0u16, |acc, u| {
        let panel = repos.get(&u.id).map(panel_height).unwrap_or(0);
        acc.saturating_add(1).saturating_add(panel)
    })
}

impl AppState {
    /// Validate the search field and start a fresh search.
    ///
    /// An empty query leaves the field focused with its inline error; nothing is sent.
    pub fn submit_search(&mut self) -> Option<Command> {
        if self.store.is_loading() {
            return None;
        }
        match self.input.submit() {
            Ok(query) => {
                tracing::info!(query = %query, "searching users");
                let ticket = self.users.load_first(&query);
                self.store.set_loading(true);
                self.input_mode = InputMode::Normal;
                Some(Command::SearchUsers(ticket))
            }
            Err(e) => {
                tracing::debug!(error = %e, "search rejected");
                self.input_mode = InputMode::Search;
                None
            }
        }
    }

    /// Select the highlighted user (collapsing whoever was selected before) or clear the
    /// selection when it is already selected.
    pub fn toggle_highlighted(&mut self) -> Option<Command> {
        let user = self.highlighted_user()?.clone();
        match self.store.toggle_selected(user.id) {
            SelectionChange::Selected { previous, current } => {
                if let Some(panel) = previous.and_then(|id| self.repos.get_mut(&id)) {
                    panel.collapse();
                }
                let (page_size, config) =
                    (self.settings.repo_page_size, self.settings.transition_config());
                let panel = self
                    .repos
                    .entry(current)
                    .or_insert_with(|| PaginatedReveal::new(page_size, config));
                let ticket = panel.load_first(&user.login);
                tracing::debug!(login = %user.login, "user selected");
                Some(Command::ListRepositories { owner: current, ticket })
            }
            SelectionChange::Cleared { previous } => {
                if let Some(panel) = self.repos.get_mut(&previous) {
                    panel.collapse();
                }
                None
            }
            SelectionChange::Unknown => None,
        }
    }

    /// Next page of the selected user's repositories.
    pub fn load_more_repos(&mut self) -> Option<Command> {
        let owner = self.store.selected()?;
        let ticket = self.repos.get_mut(&owner)?.load_more()?;
        Some(Command::ListRepositories { owner, ticket })
    }

    /// Next page of search results.
    pub fn load_more_users(&mut self) -> Option<Command> {
        let ticket = self.users.load_more()?;
        self.store.set_loading(true);
        Some(Command::SearchUsers(ticket))
    }

    /// Fold a finished fetch into state. Stale responses change nothing.
    pub fn apply_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::UsersLoaded { ticket, result } => {
                let total = result.as_ref().map(|p| p.total_count).unwrap_or_default();
                match self.users.finish(&ticket, result.map(|p| p.items)) {
                    LoadOutcome::Applied { items, cursor } => {
                        tracing::debug!(count = items.len(), total, page = cursor.page, "users loaded");
                        self.store.set_results(items, total, cursor.page);
                        self.store.set_loading(false);
                        if cursor.page <= 1 {
                            self.reset_panels();
                            self.highlighted = 0;
                            self.scroll = 0;
                        }
                    }
                    LoadOutcome::Stale => self.store.set_loading(self.users.is_loading()),
                    LoadOutcome::Failed(err) => {
                        self.store.set_loading(false);
                        self.toasts.error("Error fetching users", err.user_message(), now);
                    }
                }
            }
            AppEvent::RepositoriesLoaded { owner, ticket, result } => {
                let Some(panel) = self.repos.get_mut(&owner) else {
                    tracing::debug!(owner, "no panel for repositories; dropping");
                    return;
                };
                match panel.finish(&ticket, result) {
                    LoadOutcome::Applied { items, cursor } => {
                        tracing::debug!(owner = %ticket.key, count = items.len(), page = cursor.page, "repositories loaded");
                    }
                    LoadOutcome::Stale => {}
                    LoadOutcome::Failed(err) => {
                        self.toasts.error("Failed to fetch repositories", err.user_message(), now);
                    }
                }
            }
        }
    }

    /// Step every sequencer by one frame. Panels go first so the list measures their new
    /// heights.
    pub fn advance_transitions(&mut self, now: Instant) -> bool {
        let mut moving = false;
        for panel in self.repos.values_mut() {
            moving |= panel.advance(now, repo_panel_rows);
        }
        let repos = &self.repos;
        moving |= self.users.advance(now, |content| user_list_rows(content, repos));
        moving
    }

    /// Whether the next frame should come quickly.
    pub fn is_animating(&self, now: Instant) -> bool {
        let list = self.users.sequencer();
        if list.is_animating(now, self.users.displayed().items.len()) {
            return true;
        }
        self.repos
            .values()
            .any(|p| p.sequencer().is_animating(now, p.displayed().items.len()))
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.store.users().len() {
            self.highlighted += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(self.rows_per_page.max(1));
    }

    pub fn page_down(&mut self) {
        let last = self.store.users().len().saturating_sub(1);
        self.highlighted = self.highlighted.saturating_add(self.rows_per_page.max(1)).min(last);
    }

    /// Collapse panels of users that survived a new search and forget the rest.
    fn reset_panels(&mut self) {
        let ids: Vec<UserId> = self.store.users().iter().map(|u| u.id).collect();
        self.repos.retain(|id, _| ids.contains(id));
        for panel in self.repos.values_mut() {
            panel.collapse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::PageCursor;

    fn repo(id: u64) -> Repository {
        Repository {
            id,
            name: format!("r{id}"),
            description: None,
            language: None,
            html_url: format!("https://github.com/o/r{id}"),
            stargazers_count: 0,
            forks_count: 0,
        }
    }

    #[test]
    fn panel_rows_count_summary_cards_and_more() {
        let mut c = RevealContent::<Repository>::empty();
        assert_eq!(repo_panel_rows(&c), 0);
        c.active = true;
        assert_eq!(repo_panel_rows(&c), 1);
        c.items = vec![repo(1), repo(2)];
        c.cursor = PageCursor { page: 1, has_next_page: true };
        assert_eq!(repo_panel_rows(&c), 1 + 2 * REPO_CARD_ROWS + 1);
    }

    #[test]
    fn empty_active_list_shows_one_placeholder_row() {
        let mut c = RevealContent::<User>::empty();
        assert_eq!(user_list_rows(&c, &HashMap::new()), 0);
        c.active = true;
        assert_eq!(user_list_rows(&c, &HashMap::new()), 1);
    }
}
