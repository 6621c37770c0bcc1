//! Authenticated session and where it is read from.
//!
//! The session is stored serialized (JSON), the same way the web frontend keeps it in
//! local storage: `{"id":1,"name":"Admin","role":"ADMIN","authdata":"<base64 user:pass>"}`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    /// Base64 of `username:password`, sent as HTTP basic credentials.
    pub authdata: String,
}

impl Session {
    pub fn new(role: Role, authdata: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            role,
            authdata: authdata.into(),
        }
    }

    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Value of the `Authorization` header for API calls.
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.authdata)
    }
}

/// Source of the serialized session.
pub trait SessionStore {
    fn get_user(&self) -> Option<String>;
}

/// Reads the session from a JSON file; a missing or empty file means signed out.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get_user(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }
}

/// Fixed session, used by tests and for embedding.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(pub Option<String>);

impl MemorySessionStore {
    pub fn signed_in(session: &Session) -> Self {
        Self(serde_json::to_string(session).ok())
    }
}

impl SessionStore for MemorySessionStore {
    fn get_user(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Read and parse the current session once. Malformed data counts as signed out.
pub fn current_session(store: &dyn SessionStore) -> Option<Session> {
    let raw = store.get_user()?;
    match Session::parse(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "ignoring malformed session");
            None
        }
    }
}
