// Page behavior tests for book-admin
// Drive AppState against an in-process fake API that records every call.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use book_admin::api::{self, Book, BookApi, NewBook, SearchResponse, User};
use book_admin::app::keymap::Keymap;
use book_admin::app::page::{CollectionKind, Msg, Route};
use book_admin::app::{AppState, Theme};
use book_admin::search::OneOrMany;
use book_admin::session::{MemorySessionStore, Role, Session};
use reqwest::StatusCode;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    GetUsers,
    DeleteUser(String),
    SearchUser(String),
    GetBooks,
    DeleteBook(String),
    AddBook(NewBook),
    SearchBook(String),
}

fn down() -> api::Error {
    api::Error::Status(StatusCode::SERVICE_UNAVAILABLE)
}

#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    users: Mutex<Vec<User>>,
    books: Mutex<Vec<Book>>,
    fail_loads: AtomicBool,
    fail_mutations: AtomicBool,
    stall_loads: AtomicBool,
    // None answers the search with a failed request
    user_search: Mutex<Option<(StatusCode, OneOrMany<User>)>>,
    book_search: Mutex<Option<(StatusCode, OneOrMany<Book>)>>,
}

impl FakeApi {
    fn with_data(users: &[&str], books: &[(&str, &str)]) -> Arc<Self> {
        let api = FakeApi::default();
        *api.users.lock().unwrap() = users.iter().map(|u| User::new(*u)).collect();
        *api.books.lock().unwrap() = books.iter().map(|(i, t)| Book::new(*i, *t)).collect();
        Arc::new(api)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    async fn load_gate(&self) -> api::Result<()> {
        if self.stall_loads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_loads.load(Ordering::SeqCst) { Err(down()) } else { Ok(()) }
    }

    fn mutation_gate(&self) -> api::Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) { Err(down()) } else { Ok(()) }
    }
}

#[async_trait]
impl BookApi for FakeApi {
    async fn get_users(&self, _session: &Session) -> api::Result<Vec<User>> {
        self.record(Call::GetUsers);
        self.load_gate().await?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete_user(&self, username: &str, _session: &Session) -> api::Result<()> {
        self.record(Call::DeleteUser(username.to_string()));
        self.mutation_gate()?;
        self.users.lock().unwrap().retain(|u| u.username != username);
        Ok(())
    }

    async fn search_user(&self, username: &str, _session: &Session) -> api::Result<SearchResponse<User>> {
        self.record(Call::SearchUser(username.to_string()));
        match self.user_search.lock().unwrap().clone() {
            Some((status, data)) => Ok(SearchResponse { status, data: Some(data) }),
            None => Err(down()),
        }
    }

    async fn get_books(&self, _session: &Session) -> api::Result<Vec<Book>> {
        self.record(Call::GetBooks);
        self.load_gate().await?;
        Ok(self.books.lock().unwrap().clone())
    }

    async fn delete_book(&self, isbn: &str, _session: &Session) -> api::Result<()> {
        self.record(Call::DeleteBook(isbn.to_string()));
        self.mutation_gate()?;
        self.books.lock().unwrap().retain(|b| b.isbn != isbn);
        Ok(())
    }

    async fn add_book(&self, book: &NewBook, _session: &Session) -> api::Result<()> {
        self.record(Call::AddBook(book.clone()));
        self.mutation_gate()?;
        self.books.lock().unwrap().push(Book::new(book.isbn.clone(), book.title.clone()));
        Ok(())
    }

    async fn search_book(&self, text: &str, _session: &Session) -> api::Result<SearchResponse<Book>> {
        self.record(Call::SearchBook(text.to_string()));
        match self.book_search.lock().unwrap().clone() {
            Some((status, data)) => Ok(SearchResponse { status, data: Some(data) }),
            None => Err(down()),
        }
    }
}

fn mount_as(role: Option<Role>, api: &Arc<FakeApi>) -> AppState {
    let store = match role {
        Some(role) => MemorySessionStore::signed_in(&Session::new(role, "YWRtaW46YWRtaW4=")),
        None => MemorySessionStore(None),
    };
    AppState::mount(&store, api.clone(), Theme::dark(), Keymap::default())
}

async fn mounted_admin(api: &Arc<FakeApi>) -> AppState {
    let mut app = mount_as(Some(Role::Admin), api);
    app.settle().await;
    app
}

fn usernames(app: &AppState) -> Vec<String> {
    app.page.users.items.iter().map(|u| u.username.clone()).collect()
}

#[cfg(test)]
mod session_gate {
    use super::*;

    #[tokio::test]
    async fn non_admin_is_redirected_without_requests() {
        for role in [None, Some(Role::User), Some(Role::Other)] {
            let api = FakeApi::with_data(&["alice"], &[]);
            let mut app = mount_as(role.clone(), &api);
            assert_eq!(app.route(), Route::Home, "role {role:?}");
            assert_eq!(app.route().path(), "/");
            assert_eq!(app.in_flight(), 0);
            app.send(Msg::Load(CollectionKind::Users));
            app.settle().await;
            assert!(api.calls().is_empty(), "role {role:?} made calls");
        }
    }

    #[tokio::test]
    async fn admin_mount_loads_each_collection_once() {
        let api = FakeApi::with_data(&["alice", "bob"], &[("1", "Dune")]);
        let app = mounted_admin(&api).await;
        assert_eq!(app.route(), Route::Admin);
        assert_eq!(api.count(&Call::GetUsers), 1);
        assert_eq!(api.count(&Call::GetBooks), 1);
        assert_eq!(api.calls().len(), 2);
        assert_eq!(usernames(&app), ["alice", "bob"]);
        assert_eq!(app.page.books.items, vec![Book::new("1", "Dune")]);
        assert!(!app.page.users.is_loading);
        assert!(!app.page.books.is_loading);
    }

    #[tokio::test]
    async fn session_is_read_once_at_mount() {
        let api = FakeApi::with_data(&[], &[]);
        let store = MemorySessionStore::signed_in(&Session::new(Role::Admin, "x"));
        let mut app = AppState::mount(&store, api.clone(), Theme::dark(), Keymap::default());
        drop(store);
        app.settle().await;
        app.send(Msg::Load(CollectionKind::Books));
        app.settle().await;
        assert!(app.page.is_admin());
        assert_eq!(api.count(&Call::GetBooks), 2);
    }
}

#[cfg(test)]
mod loading {
    use super::*;

    #[tokio::test]
    async fn failed_load_keeps_list_and_clears_flag() {
        let api = FakeApi::with_data(&["bob"], &[]);
        let mut app = mounted_admin(&api).await;

        api.fail_loads.store(true, Ordering::SeqCst);
        app.send(Msg::Load(CollectionKind::Users));
        assert!(app.page.users.is_loading);
        app.settle().await;

        assert_eq!(usernames(&app), ["bob"]);
        assert!(!app.page.users.is_loading);
    }

    #[tokio::test]
    async fn unmount_aborts_in_flight_requests() {
        let api = FakeApi::with_data(&["bob"], &[("1", "Dune")]);
        api.stall_loads.store(true, Ordering::SeqCst);
        let mut app = mount_as(Some(Role::Admin), &api);
        assert_eq!(app.in_flight(), 2);

        app.unmount().await;
        assert_eq!(app.in_flight(), 0);
        assert_eq!(app.pump(), 0);
        assert!(app.page.users.items.is_empty());
        assert!(app.page.books.items.is_empty());
    }
}

#[cfg(test)]
mod searching {
    use super::*;

    #[tokio::test]
    async fn single_user_answer_becomes_one_row() {
        let api = FakeApi::with_data(&["alice", "bob"], &[]);
        *api.user_search.lock().unwrap() = Some((StatusCode::OK, OneOrMany::One(User::new("alice"))));
        let mut app = mounted_admin(&api).await;

        app.send(Msg::UserSearchChanged("alice".into()));
        app.send(Msg::SearchUsers);
        app.settle().await;

        assert_eq!(api.count(&Call::SearchUser("alice".into())), 1);
        assert_eq!(app.page.users.items, vec![User::new("alice")]);
    }

    #[tokio::test]
    async fn not_found_empties_the_list_regardless_of_payload() {
        let api = FakeApi::with_data(&["alice", "bob"], &[]);
        *api.user_search.lock().unwrap() = Some((StatusCode::NOT_FOUND, OneOrMany::One(User::new("alice"))));
        let mut app = mounted_admin(&api).await;

        app.send(Msg::UserSearchChanged("zed".into()));
        app.send(Msg::SearchUsers);
        app.settle().await;

        assert!(app.page.users.items.is_empty());
    }

    #[tokio::test]
    async fn book_search_replaces_instead_of_filtering() {
        let api = FakeApi::with_data(&[], &[("1", "Dune"), ("2", "Emma")]);
        let hits = vec![Book::new("3", "Dune Messiah"), Book::new("1", "Dune")];
        *api.book_search.lock().unwrap() = Some((StatusCode::OK, OneOrMany::Many(hits.clone())));
        let mut app = mounted_admin(&api).await;

        app.send(Msg::BookSearchChanged("dune".into()));
        app.send(Msg::SearchBooks);
        app.settle().await;

        assert_eq!(api.count(&Call::SearchBook("dune".into())), 1);
        assert_eq!(app.page.books.items, hits);
    }

    #[tokio::test]
    async fn failed_search_request_keeps_the_list() {
        let api = FakeApi::with_data(&["alice", "bob"], &[]);
        let mut app = mounted_admin(&api).await;

        app.send(Msg::SearchUsers);
        app.settle().await;

        assert_eq!(api.count(&Call::SearchUser(String::new())), 1);
        assert_eq!(usernames(&app), ["alice", "bob"]);
    }
}

#[cfg(test)]
mod mutations {
    use super::*;

    #[tokio::test]
    async fn add_book_with_empty_title_is_a_no_op() {
        let api = FakeApi::with_data(&[], &[]);
        let mut app = mounted_admin(&api).await;
        let before = api.calls().len();

        app.send(Msg::BookIsbnChanged("978".into()));
        app.send(Msg::AddBook);

        assert_eq!(app.in_flight(), 0);
        app.settle().await;
        assert_eq!(api.calls().len(), before);
        assert_eq!(app.page.book_form.isbn, "978");
        assert_eq!(app.page.book_form.title, "");
    }

    #[tokio::test]
    async fn add_book_clears_form_and_reloads_once() {
        let api = FakeApi::with_data(&[], &[]);
        let mut app = mounted_admin(&api).await;

        app.send(Msg::BookIsbnChanged("978".into()));
        app.send(Msg::BookTitleChanged("Dune".into()));
        app.send(Msg::AddBook);
        app.settle().await;

        let added = NewBook { isbn: "978".into(), title: "Dune".into() };
        assert_eq!(api.count(&Call::AddBook(added)), 1);
        assert_eq!(api.count(&Call::GetBooks), 2);
        assert_eq!(app.page.book_form.isbn, "");
        assert_eq!(app.page.book_form.title, "");
        assert_eq!(app.page.books.items, vec![Book::new("978", "Dune")]);
    }

    #[tokio::test]
    async fn failed_add_keeps_the_form() {
        let api = FakeApi::with_data(&[], &[]);
        let mut app = mounted_admin(&api).await;
        api.fail_mutations.store(true, Ordering::SeqCst);

        app.send(Msg::BookIsbnChanged("978".into()));
        app.send(Msg::BookTitleChanged("Dune".into()));
        app.send(Msg::AddBook);
        app.settle().await;

        assert_eq!(api.count(&Call::GetBooks), 1);
        assert_eq!(app.page.book_form.isbn, "978");
        assert_eq!(app.page.book_form.title, "Dune");
    }

    #[tokio::test]
    async fn delete_user_reloads_once_on_success() {
        let api = FakeApi::with_data(&["alice", "bob"], &[]);
        let mut app = mounted_admin(&api).await;

        app.send(Msg::DeleteUser("bob".into()));
        app.settle().await;

        assert_eq!(api.count(&Call::DeleteUser("bob".into())), 1);
        assert_eq!(api.count(&Call::GetUsers), 2);
        assert_eq!(usernames(&app), ["alice"]);
    }

    #[tokio::test]
    async fn failed_delete_user_does_not_reload() {
        let api = FakeApi::with_data(&["alice", "bob"], &[]);
        let mut app = mounted_admin(&api).await;
        api.fail_mutations.store(true, Ordering::SeqCst);

        app.send(Msg::DeleteUser("bob".into()));
        app.settle().await;

        assert_eq!(api.count(&Call::GetUsers), 1);
        assert_eq!(usernames(&app), ["alice", "bob"]);
    }

    #[tokio::test]
    async fn delete_book_reloads_books_only() {
        let api = FakeApi::with_data(&["alice"], &[("1", "Dune"), ("2", "Emma")]);
        let mut app = mounted_admin(&api).await;

        app.send(Msg::DeleteBook("1".into()));
        app.settle().await;

        assert_eq!(api.count(&Call::GetBooks), 2);
        assert_eq!(api.count(&Call::GetUsers), 1);
        assert_eq!(app.page.books.items, vec![Book::new("2", "Emma")]);
    }
}
