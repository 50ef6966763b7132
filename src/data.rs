//! Data processing and serialization.

use serde::{Deserialize, Serialize};

pub mod commit_message;
pub mod yaml;

pub use commit_message::{strip_comments, CommitMessageFile};
pub use yaml::*;

/// Generated pull request content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrContent {
    /// Single-line PR title.
    pub title: String,
    /// Markdown PR description.
    #[serde(default)]
    pub body: String,
}
