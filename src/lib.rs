//! Library crate for gh-user-search.
//!
//! This crate exposes the building blocks of the TUI:
//! - GitHub REST access behind an async trait (`github`)
//! - Pagination, fetch orchestration and selection state (`paging`, `fetch`, `store`)
//! - Height/stagger animation driven by the draw loop (`transition`, `reveal`)
//! - Application state, key handling and event loop (`app`)
//! - UI rendering and widgets (`ui`)
//! - Settings files and file logging (`config`, `logging`)
//!
//! It is used by the `gh-user-search` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod github;
pub mod logging;
pub mod paging;
pub mod reveal;
pub mod search;
pub mod store;
pub mod transition;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::{Error, FetchError, Result, ValidationError};
pub use github::{GithubApi, GithubClient, Repository, User, UserId, UserSearchPage};
