//! Utility functions and helpers.

pub mod environment;
pub mod preflight;
pub mod settings;

pub use environment::InteractionMode;
pub use preflight::{check_git_repository, check_github_cli};
pub use settings::Settings;
