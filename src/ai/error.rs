//! AI invocation and response errors.

use std::time::Duration;

use thiserror::Error;

/// Failures running the external AI CLI.
#[derive(Error, Debug)]
pub enum AiError {
    /// The configured command line is blank.
    #[error("AI_HELPER_COMMAND is empty")]
    EmptyCommand,

    /// The AI CLI executable could not be found.
    #[error("AI command '{0}' not found. Install it or set AI_HELPER_COMMAND")]
    CommandNotFound(String),

    /// The AI CLI could not be started or talked to.
    #[error("Failed to run AI command '{program}': {source}")]
    Io {
        /// Executable name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The AI CLI exited unsuccessfully.
    #[error("AI command exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status description.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The AI CLI did not finish in time and was killed.
    #[error("AI command timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// The AI CLI printed nothing.
    #[error("AI command returned an empty response")]
    EmptyResponse,
}

/// Failures interpreting AI output.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResponseError {
    /// No commit message could be extracted.
    #[error("AI response did not contain a commit message")]
    MissingCommitMessage,

    /// No PR title could be extracted.
    #[error("AI response did not contain a pull request title")]
    MissingTitle,
}
