//! Application state types and entry glue.
//!
//! `AppState` couples the [`page::AdminPage`] domain state with what the terminal
//! needs on top of it: focus, selection, the field being edited, modals, theme and
//! keymap. The event loop lives in [`update`] and is re-exported as `run`.
//!
pub mod config;
pub mod dispatch;
pub mod keymap;
pub mod page;
pub mod theme;
pub mod update;

use std::sync::Arc;

use tracing::info;

use crate::api::{Book, BookApi, User};
use crate::session::{self, SessionStore};
use dispatch::Dispatcher;
use keymap::Keymap;
use page::{AdminPage, CollectionKind, Msg, Route};

pub use config::{config_file_read_path, config_file_write_path};
pub use theme::Theme;

/// Which table has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Users,
    Books,
}

impl Focus {
    pub fn kind(self) -> CollectionKind {
        match self {
            Focus::Users => CollectionKind::Users,
            Focus::Books => CollectionKind::Books,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Focus::Users => Focus::Books,
            Focus::Books => Focus::Users,
        }
    }
}

/// Editable text inputs on the page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    UserSearch,
    BookSearch,
    BookIsbn,
    BookTitle,
}

impl Field {
    /// The tagged message that stores `value` into this field.
    pub fn changed(self, value: String) -> Msg {
        match self {
            Field::UserSearch => Msg::UserSearchChanged(value),
            Field::BookSearch => Msg::BookSearchChanged(value),
            Field::BookIsbn => Msg::BookIsbnChanged(value),
            Field::BookTitle => Msg::BookTitleChanged(value),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::UserSearch => "Search users",
            Field::BookSearch => "Search books",
            Field::BookIsbn => "ISBN",
            Field::BookTitle => "Title",
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing(Field),
    Modal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    User(String),
    Book(String),
}

impl DeleteTarget {
    pub fn into_msg(self) -> Msg {
        match self {
            DeleteTarget::User(username) => Msg::DeleteUser(username),
            DeleteTarget::Book(isbn) => Msg::DeleteBook(isbn),
        }
    }
}

/// Modal dialogs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    DeleteConfirm { target: DeleteTarget, selected: usize },
    Help { scroll: u16 },
}

pub struct AppState {
    pub page: AdminPage,
    dispatcher: Option<Dispatcher>,
    pub signed_in_as: Option<String>,
    pub focus: Focus,
    pub selected_user_index: usize,
    pub selected_book_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub should_quit: bool,
}

impl AppState {
    /// Read the session once and mount the admin page.
    ///
    /// Admins get their initial loads dispatched immediately, so this must run
    /// inside a tokio runtime.
    pub fn mount(store: &dyn SessionStore, api: Arc<dyn BookApi>, theme: Theme, keymap: Keymap) -> Self {
        let session = session::current_session(store);
        let (page, commands) = AdminPage::mount(session.as_ref());
        let signed_in_as = session.as_ref().and_then(|s| s.name.clone());
        let dispatcher = match session {
            Some(session) if page.is_admin() => {
                let mut dispatcher = Dispatcher::new(api, session);
                dispatcher.dispatch(commands);
                Some(dispatcher)
            }
            _ => None,
        };
        info!(route = page.route().path(), "admin page mounted");
        Self {
            page,
            dispatcher,
            signed_in_as,
            focus: Focus::Users,
            selected_user_index: 0,
            selected_book_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    /// Feed a message to the page and dispatch whatever it asks for.
    pub fn send(&mut self, msg: Msg) {
        let commands = self.page.update(msg);
        if let Some(dispatcher) = self.dispatcher.as_mut() {
            dispatcher.dispatch(commands);
        }
        self.clamp_selection();
    }

    /// Apply every completion that is ready; returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let ready = match self.dispatcher.as_mut() {
            Some(dispatcher) => dispatcher.ready(),
            None => return 0,
        };
        let applied = ready.len();
        for msg in ready {
            self.send(msg);
        }
        applied
    }

    /// Wait until nothing is in flight, applying completions (and the requests they
    /// trigger) as they arrive.
    pub async fn settle(&mut self) {
        loop {
            let next = match self.dispatcher.as_mut() {
                Some(dispatcher) => dispatcher.next().await,
                None => None,
            };
            match next {
                Some(msg) => self.send(msg),
                None => break,
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.as_ref().map_or(0, Dispatcher::in_flight)
    }

    /// Abort pending requests; later completions are never applied.
    pub async fn unmount(&mut self) {
        if let Some(mut dispatcher) = self.dispatcher.take() {
            dispatcher.shutdown().await;
        }
        info!("admin page unmounted");
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::UserSearch => &self.page.user_username_search,
            Field::BookSearch => &self.page.book_text_search,
            Field::BookIsbn => &self.page.book_form.isbn,
            Field::BookTitle => &self.page.book_form.title,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.page.users.items.get(self.selected_user_index)
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.page.books.items.get(self.selected_book_index)
    }

    fn clamp_selection(&mut self) {
        let users = self.page.users.items.len();
        let books = self.page.books.items.len();
        self.selected_user_index = self.selected_user_index.min(users.saturating_sub(1));
        self.selected_book_index = self.selected_book_index.min(books.saturating_sub(1));
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
