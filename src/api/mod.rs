//! Book API client surface.
//!
//! The admin page talks to the backend only through the [`BookApi`] trait so tests
//! can substitute an in-process fake. [`http::HttpBookApi`] is the `reqwest` implementation.
//!
pub mod http;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::search::OneOrMany;
use crate::session::Session;

pub use http::HttpBookApi;

/// A user account as returned by `/api/users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            name: None,
            email: None,
            role: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
}

impl Book {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
        }
    }
}

/// Request body for `POST /api/books`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
}

/// Raw answer of a search endpoint.
///
/// `data` is only decoded when the server answered `200 OK`; any other status
/// leaves it empty.
#[derive(Debug)]
pub struct SearchResponse<T> {
    pub status: StatusCode,
    pub data: Option<OneOrMany<T>>,
}

impl<T> SearchResponse<T> {
    pub fn ok(data: OneOrMany<T>) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self { status, data: None }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport, TLS or body decoding failure inside reqwest
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success status returned by the server
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("base url cannot carry a path: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Operations the admin page consumes. Every call takes the session explicitly.
#[async_trait]
pub trait BookApi: Send + Sync {
    async fn get_users(&self, session: &Session) -> Result<Vec<User>>;

    async fn delete_user(&self, username: &str, session: &Session) -> Result<()>;

    async fn search_user(&self, username: &str, session: &Session) -> Result<SearchResponse<User>>;

    async fn get_books(&self, session: &Session) -> Result<Vec<Book>>;

    async fn delete_book(&self, isbn: &str, session: &Session) -> Result<()>;

    async fn add_book(&self, book: &NewBook, session: &Session) -> Result<()>;

    async fn search_book(&self, text: &str, session: &Session) -> Result<SearchResponse<Book>>;
}
