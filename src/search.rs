//! Search result handling shared by the users and books collections.
//!
//! A search endpoint answers either a single record or a list of records. The page
//! always stores a list, so the payload is normalized here, and the HTTP outcome is
//! turned into what should happen to the displayed list.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::api::{self, SearchResponse};

/// A payload that is either one record or a sequence of records.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// What a settled search does to the list it targets.
#[derive(Debug)]
pub enum SearchOutcome<T> {
    /// Replace the list with these records.
    Replace(Vec<T>),
    /// The request never produced an answer; keep the list as it is.
    Failed(api::Error),
}

impl<T> SearchOutcome<T> {
    /// Resolve a search call result.
    ///
    /// `200 OK` yields the normalized payload. Any other status the server answered
    /// with empties the list regardless of payload. Transport and decode failures keep
    /// the list, the same way a failed load does.
    pub fn resolve(result: api::Result<SearchResponse<T>>) -> Self {
        match result {
            Ok(SearchResponse { status, data }) if status == StatusCode::OK => {
                SearchOutcome::Replace(data.map(OneOrMany::into_vec).unwrap_or_default())
            }
            Ok(_) => SearchOutcome::Replace(Vec::new()),
            Err(err) => SearchOutcome::Failed(err),
        }
    }
}
