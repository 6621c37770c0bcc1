//! Admin console settings: parse/write `admin.conf` and locate config files.
//!
//! Files use the same `key = value` format as `theme.conf` and `keybinds.conf`.
//! Lookup order for an existing file:
//! - `$XDG_CONFIG_HOME/book-admin/<name>`
//! - `$HOME/.config/book-admin/<name>`
//! - `./<name>`
//!
//! Command line flags and environment variables override what the file says; that
//! layering happens in the binary.

use std::path::{Path, PathBuf};

use crate::error::{Context, Result};

const APP_DIR: &str = "book-admin";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_LOG_FILE: &str = "book-admin.log";

/// Settings read from `admin.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminConfig {
    /// Base URL of the book API, without the `/api` suffix.
    pub api_url: String,
    /// JSON file holding the signed-in session.
    pub session_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AdminConfig {
    pub const FILE_NAME: &'static str = "admin.conf";

    /// Parse `key = value` lines on top of the defaults. Unknown keys are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in key_values(contents) {
            match key {
                "api_url" => cfg.api_url = value.to_string(),
                "session_file" => cfg.session_file = PathBuf::from(value),
                "log_file" => cfg.log_file = PathBuf::from(value),
                _ => {}
            }
        }
        cfg
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# book-admin settings\n");
        buf.push_str("# Flags and BOOK_ADMIN_* environment variables take precedence.\n\n");
        let _ = writeln!(buf, "api_url = {}", self.api_url);
        let _ = writeln!(buf, "session_file = {}", self.session_file.display());
        let _ = writeln!(buf, "log_file = {}", self.log_file.display());
        std::fs::write(path, buf)
    }

    /// Load from `path` if given, else from the standard locations. When nothing
    /// exists yet a default file is written to the write location.
    pub fn load_or_init(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::from_file(p);
        }
        if let Some(existing) = config_file_read_path(Self::FILE_NAME) {
            return Self::from_file(&existing);
        }
        let cfg = Self::default();
        let _ = cfg.write_file(&config_file_write_path(Self::FILE_NAME));
        Ok(cfg)
    }
}

/// Iterate the non-comment `key = value` pairs of a config file.
pub fn key_values(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() { None } else { Some((key, value)) }
    })
}

fn config_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(home).join(".config").join(APP_DIR));
    }
    dirs
}

/// First existing config file called `name`.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    config_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .chain(std::iter::once(PathBuf::from(name)))
        .find(|p| p.is_file())
}

/// Where a fresh config file called `name` should be written.
pub fn config_file_write_path(name: &str) -> PathBuf {
    for dir in config_dirs() {
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join(name);
        }
    }
    PathBuf::from(name)
}
