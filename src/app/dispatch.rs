//! Bridge from UI commands to async GitHub calls and back.
//!
//! The UI thread never awaits. It hands a [`Command`] to the [`Dispatcher`], which runs it
//! on the tokio runtime and sends exactly one [`AppEvent`] back over an mpsc channel that
//! the event loop drains every tick.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::FetchError;
use crate::fetch::Ticket;
use crate::github::{GithubApi, Repository, UserId, UserSearchPage};

/// Work requested by the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `ticket.key` is the query.
    SearchUsers(Ticket),
    /// `ticket.key` is the owner login.
    ListRepositories { owner: UserId, ticket: Ticket },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchUsers(_) => "search_users",
            Self::ListRepositories { .. } => "list_repositories",
        }
    }
}

/// Completed work delivered back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    UsersLoaded { ticket: Ticket, result: Result<UserSearchPage, FetchError> },
    RepositoriesLoaded {
        owner: UserId,
        ticket: Ticket,
        result: Result<Vec<Repository>, FetchError>,
    },
}

/// Run one command to completion.
pub async fn execute(api: &dyn GithubApi, cmd: Command) -> AppEvent {
    match cmd {
        Command::SearchUsers(ticket) => {
            let result = api.search_users(&ticket.key, ticket.page, ticket.page_size).await;
            AppEvent::UsersLoaded { ticket, result }
        }
        Command::ListRepositories { owner, ticket } => {
            let result = api.list_repositories(&ticket.key, ticket.page, ticket.page_size).await;
            AppEvent::RepositoriesLoaded { owner, ticket, result }
        }
    }
}

pub struct Dispatcher {
    api: Arc<dyn GithubApi>,
    handle: Handle,
    tx: UnboundedSender<AppEvent>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn GithubApi>, handle: Handle) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { api, handle, tx }, rx)
    }

    /// Spawn `cmd`; its result arrives later on the receiver.
    pub fn dispatch(&self, cmd: Command) {
        tracing::debug!(command = cmd.name(), "dispatching");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let event = execute(api.as_ref(), cmd).await;
            if tx.send(event).is_err() {
                tracing::debug!("event loop gone; dropping response");
            }
        });
    }
}
