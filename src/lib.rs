//! # git-ai-helpers
//!
//! AI-written commit messages and pull requests, driven by an external AI
//! CLI (`claude -p` by default) and the GitHub CLI.
//!
//! ## Features
//!
//! - A `prepare-commit-msg` hook that drafts commit messages from the staged diff
//! - `ai-pr`, which drafts a pull request title and description and opens it with `gh`
//! - An accept/edit/reject menu, skipped automatically in CI and agent sessions
//!
//! ## Quick Start
//!
//! ```rust
//! use git_ai_helpers::ai::response::parse_commit_message;
//!
//! let message = parse_commit_message("<commit_message>fix: typo</commit_message>").unwrap();
//! assert_eq!(message, "fix: typo");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ai;
pub mod cli;
pub mod config;
pub mod data;
pub mod git;
pub mod github;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of git-ai-helpers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
