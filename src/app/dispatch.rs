//! Runs page commands against the API as tokio tasks.
//!
//! In-flight requests live in a `JoinSet` owned by the dispatcher. Dropping the
//! dispatcher (or calling [`Dispatcher::shutdown`]) aborts every pending request, so
//! no completion reaches a page that is gone.

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use super::page::{Command, Msg};
use crate::api::BookApi;
use crate::search::SearchOutcome;
use crate::session::Session;

/// Execute one command and turn its result into the completion message.
pub async fn perform(api: &dyn BookApi, session: &Session, command: Command) -> Msg {
    match command {
        Command::FetchUsers => Msg::UsersLoaded(api.get_users(session).await),
        Command::FetchBooks => Msg::BooksLoaded(api.get_books(session).await),
        Command::SearchUsers(query) => {
            Msg::UsersSearched(SearchOutcome::resolve(api.search_user(&query, session).await))
        }
        Command::SearchBooks(text) => {
            Msg::BooksSearched(SearchOutcome::resolve(api.search_book(&text, session).await))
        }
        Command::DeleteUser(username) => Msg::UserDeleted(api.delete_user(&username, session).await),
        Command::DeleteBook(isbn) => Msg::BookDeleted(api.delete_book(&isbn, session).await),
        Command::AddBook(book) => Msg::BookAdded(api.add_book(&book, session).await),
    }
}

pub struct Dispatcher {
    api: Arc<dyn BookApi>,
    session: Arc<Session>,
    in_flight: JoinSet<Msg>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn BookApi>, session: Session) -> Self {
        Self {
            api,
            session: Arc::new(session),
            in_flight: JoinSet::new(),
        }
    }

    /// Spawn each command. Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, commands: Vec<Command>) {
        for command in commands {
            debug!(?command, "dispatching");
            let api = Arc::clone(&self.api);
            let session = Arc::clone(&self.session);
            self.in_flight
                .spawn(async move { perform(api.as_ref(), &session, command).await });
        }
    }

    /// Completions that are ready right now, without waiting.
    pub fn ready(&mut self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Some(msg) = settled(joined) {
                msgs.push(msg);
            }
        }
        msgs
    }

    /// Wait for the next completion; `None` once nothing is in flight.
    pub async fn next(&mut self) -> Option<Msg> {
        while let Some(joined) = self.in_flight.join_next().await {
            if let Some(msg) = settled(joined) {
                return Some(msg);
            }
        }
        None
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Abort every pending request and wait for the tasks to wind down.
    pub async fn shutdown(&mut self) {
        self.in_flight.shutdown().await;
    }
}

fn settled(joined: Result<Msg, JoinError>) -> Option<Msg> {
    match joined {
        Ok(msg) => Some(msg),
        Err(e) if e.is_cancelled() => None,
        Err(e) => {
            warn!(error = %e, "request task panicked");
            None
        }
    }
}
