//! Library crate for book-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Book API client and records (`api`)
//! - Application state, page update loop and request dispatch (`app`)
//! - Error and result types (`error`)
//! - Search payload normalization (`search`)
//! - Session parsing and session stores (`session`)
//! - UI rendering (`ui`)
//!
//! It is used by the `book-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod search;
pub mod session;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
