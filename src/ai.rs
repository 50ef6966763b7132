//! AI CLI integration: prompts, invocation, and response parsing.

pub mod command;
pub mod error;
pub mod prompts;
pub mod response;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_utils;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

pub use command::CommandAiClient;
pub use error::{AiError, ResponseError};

/// Trait for text-generation backends.
pub trait AiClient: Send + Sync {
    /// Sends a prompt and returns the raw completion text.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Returns a short human-readable description of the backend.
    fn describe(&self) -> String;
}
