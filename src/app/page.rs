//! Admin page state and its update function.
//!
//! `AdminPage` owns the users and books lists, the search buffers and the add-book
//! form. Input arrives as [`Msg`] values; `update` mutates the page and returns the
//! [`Command`]s (API calls) to run. Completions come back as messages, so the page never
//! awaits anything itself.

use tracing::{debug, warn};

use crate::api::{self, Book, NewBook, User};
use crate::search::SearchOutcome;
use crate::session::Session;

/// Where the app currently is. Non-admins are sent to the root path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Admin,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Admin => "/admin",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    Users,
    Books,
}

/// A server-backed list and its loading flag.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
        }
    }
}

impl<T> Collection<T> {
    fn start_load(&mut self) {
        self.is_loading = true;
    }

    fn settle_load(&mut self, kind: CollectionKind, result: api::Result<Vec<T>>) {
        match result {
            Ok(items) => self.items = items,
            Err(e) => warn!(?kind, error = %e, "load failed, keeping previous list"),
        }
        self.is_loading = false;
    }

    fn settle_search(&mut self, kind: CollectionKind, outcome: SearchOutcome<T>) {
        match outcome {
            SearchOutcome::Replace(items) => self.items = items,
            SearchOutcome::Failed(e) => warn!(?kind, error = %e, "search failed, keeping previous list"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookForm {
    pub isbn: String,
    pub title: String,
}

impl BookForm {
    /// Both fields must be filled for a submit to go out.
    pub fn to_new_book(&self) -> Option<NewBook> {
        if self.isbn.is_empty() || self.title.is_empty() {
            return None;
        }
        Some(NewBook {
            isbn: self.isbn.clone(),
            title: self.title.clone(),
        })
    }

    pub fn clear(&mut self) {
        self.isbn.clear();
        self.title.clear();
    }
}

/// Everything that can change the page.
#[derive(Debug)]
pub enum Msg {
    UserSearchChanged(String),
    BookSearchChanged(String),
    BookIsbnChanged(String),
    BookTitleChanged(String),

    Load(CollectionKind),
    SearchUsers,
    SearchBooks,
    DeleteUser(String),
    DeleteBook(String),
    AddBook,

    UsersLoaded(api::Result<Vec<User>>),
    BooksLoaded(api::Result<Vec<Book>>),
    UsersSearched(SearchOutcome<User>),
    BooksSearched(SearchOutcome<Book>),
    UserDeleted(api::Result<()>),
    BookDeleted(api::Result<()>),
    BookAdded(api::Result<()>),
}

/// API calls requested by the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchUsers,
    FetchBooks,
    SearchUsers(String),
    SearchBooks(String),
    DeleteUser(String),
    DeleteBook(String),
    AddBook(NewBook),
}

#[derive(Clone, Debug, Default)]
pub struct AdminPage {
    is_admin: bool,
    pub users: Collection<User>,
    pub books: Collection<Book>,
    pub user_username_search: String,
    pub book_text_search: String,
    pub book_form: BookForm,
}

impl AdminPage {
    /// Build the page from the session read at mount time.
    ///
    /// An admin gets the initial users and books loads; anyone else gets a page that
    /// only redirects and issues nothing.
    pub fn mount(session: Option<&Session>) -> (Self, Vec<Command>) {
        let mut page = Self {
            is_admin: session.is_some_and(Session::is_admin),
            ..Self::default()
        };
        if !page.is_admin {
            return (page, Vec::new());
        }
        let mut commands = page.update(Msg::Load(CollectionKind::Users));
        commands.extend(page.update(Msg::Load(CollectionKind::Books)));
        (page, commands)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn route(&self) -> Route {
        if self.is_admin { Route::Admin } else { Route::Home }
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        if !self.is_admin {
            debug!(?msg, "page not mounted for admin, dropping message");
            return Vec::new();
        }
        match msg {
            Msg::UserSearchChanged(text) => self.user_username_search = text,
            Msg::BookSearchChanged(text) => self.book_text_search = text,
            Msg::BookIsbnChanged(text) => self.book_form.isbn = text,
            Msg::BookTitleChanged(text) => self.book_form.title = text,

            Msg::Load(CollectionKind::Users) => {
                self.users.start_load();
                return vec![Command::FetchUsers];
            }
            Msg::Load(CollectionKind::Books) => {
                self.books.start_load();
                return vec![Command::FetchBooks];
            }
            Msg::SearchUsers => return vec![Command::SearchUsers(self.user_username_search.clone())],
            Msg::SearchBooks => return vec![Command::SearchBooks(self.book_text_search.clone())],
            Msg::DeleteUser(username) => return vec![Command::DeleteUser(username)],
            Msg::DeleteBook(isbn) => return vec![Command::DeleteBook(isbn)],
            Msg::AddBook => {
                return self
                    .book_form
                    .to_new_book()
                    .map(Command::AddBook)
                    .into_iter()
                    .collect();
            }

            Msg::UsersLoaded(result) => self.users.settle_load(CollectionKind::Users, result),
            Msg::BooksLoaded(result) => self.books.settle_load(CollectionKind::Books, result),
            Msg::UsersSearched(outcome) => self.users.settle_search(CollectionKind::Users, outcome),
            Msg::BooksSearched(outcome) => self.books.settle_search(CollectionKind::Books, outcome),
            Msg::UserDeleted(Ok(())) => return self.update(Msg::Load(CollectionKind::Users)),
            Msg::BookDeleted(Ok(())) => return self.update(Msg::Load(CollectionKind::Books)),
            Msg::UserDeleted(Err(e)) => warn!(error = %e, "delete user failed"),
            Msg::BookDeleted(Err(e)) => warn!(error = %e, "delete book failed"),
            Msg::BookAdded(Ok(())) => {
                self.book_form.clear();
                return self.update(Msg::Load(CollectionKind::Books));
            }
            Msg::BookAdded(Err(e)) => warn!(error = %e, "add book failed, keeping form"),
        }
        Vec::new()
    }
}
