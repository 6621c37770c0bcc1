use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{BookApi, Book, Error, NewBook, Result, SearchResponse, User};
use crate::search::OneOrMany;
use crate::session::Session;

/// `reqwest` backed client for the book API.
///
/// Holds no credentials itself; the session passed to each call supplies the
/// `Authorization` header.
#[derive(Clone, Debug)]
pub struct HttpBookApi {
    client: Client,
    base_url: Url,
}

impl HttpBookApi {
    pub fn new<T: IntoUrl>(base_url: T) -> Result<Self> {
        let client = Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client<T: IntoUrl>(client: Client, base_url: T) -> Result<Self> {
        let base_url = base_url.into_url()?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> RequestBuilder {
        debug!(%method, %url, "book api request");
        self.client
            .request(method, url)
            .header(AUTHORIZATION, session.authorization())
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Error::Status(status))
        }
    }

    async fn fetch_all<T: DeserializeOwned>(&self, url: Url, session: &Session) -> Result<Vec<T>> {
        let resp = self.send(self.request(Method::GET, url, session)).await?;
        Ok(resp.json().await?)
    }

    async fn search<T: DeserializeOwned>(&self, url: Url, session: &Session) -> Result<SearchResponse<T>> {
        let resp = self.request(Method::GET, url, session).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            debug!(%status, "search answered without a payload");
            return Ok(SearchResponse::status(status));
        }
        let data: OneOrMany<T> = resp.json().await?;
        Ok(SearchResponse {
            status,
            data: Some(data),
        })
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn get_users(&self, session: &Session) -> Result<Vec<User>> {
        let url = self.endpoint(&["api", "users"])?;
        self.fetch_all(url, session).await
    }

    async fn delete_user(&self, username: &str, session: &Session) -> Result<()> {
        let url = self.endpoint(&["api", "users", username])?;
        self.send(self.request(Method::DELETE, url, session)).await?;
        Ok(())
    }

    async fn search_user(&self, username: &str, session: &Session) -> Result<SearchResponse<User>> {
        let url = if username.is_empty() {
            self.endpoint(&["api", "users"])?
        } else {
            self.endpoint(&["api", "users", username])?
        };
        self.search(url, session).await
    }

    async fn get_books(&self, session: &Session) -> Result<Vec<Book>> {
        let url = self.endpoint(&["api", "books"])?;
        self.fetch_all(url, session).await
    }

    async fn delete_book(&self, isbn: &str, session: &Session) -> Result<()> {
        let url = self.endpoint(&["api", "books", isbn])?;
        self.send(self.request(Method::DELETE, url, session)).await?;
        Ok(())
    }

    async fn add_book(&self, book: &NewBook, session: &Session) -> Result<()> {
        let url = self.endpoint(&["api", "books"])?;
        self.send(self.request(Method::POST, url, session).json(book))
            .await?;
        Ok(())
    }

    async fn search_book(&self, text: &str, session: &Session) -> Result<SearchResponse<Book>> {
        let mut url = self.endpoint(&["api", "books"])?;
        if !text.is_empty() {
            url.query_pairs_mut().append_pair("text", text);
        }
        self.search(url, session).await
    }
}
