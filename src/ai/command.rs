//! Subprocess-backed AI client.
//!
//! The prompt is written to the child's stdin and the completion is read from
//! its stdout, so any CLI that follows that convention works (`claude -p`,
//! `llm`, `ollama run <model>`, ...).

use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::ai::{AiClient, AiError};
use crate::config::HelperConfig;

/// Runs an external AI CLI for each completion.
#[derive(Debug, Clone)]
pub struct CommandAiClient {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandAiClient {
    /// Creates a client from a command line, an optional model, and a timeout.
    pub fn new(command_line: &str, model: Option<&str>, timeout: Duration) -> Result<Self, AiError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(AiError::EmptyCommand)?;
        let mut args: Vec<String> = parts.collect();
        if let Some(model) = model {
            args.push("--model".to_string());
            args.push(model.to_string());
        }
        Ok(Self {
            program,
            args,
            timeout,
        })
    }

    /// Creates a client from resolved configuration.
    pub fn from_config(config: &HelperConfig) -> Result<Self, AiError> {
        Self::new(&config.ai_command, config.model.as_deref(), config.timeout)
    }

    /// Returns the executable name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments passed to the executable.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    async fn run(&self, prompt: &str) -> Result<String, AiError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            prompt_len = prompt.len(),
            "Spawning AI command"
        );

        let io_error = |source: std::io::Error| AiError::Io {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AiError::CommandNotFound(self.program.clone()),
                _ => io_error(e),
            })?;

        // Writing and draining run together under the timeout: a child may
        // never read its stdin, or may fill stdout before it finishes reading.
        let stdin = child.stdin.take();
        let write_prompt = async move {
            if let Some(mut stdin) = stdin {
                // A child that exits without reading stdin closes the pipe
                // early; its exit status is what gets reported.
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    if e.kind() != ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
                // Dropping stdin closes the pipe so the child sees EOF.
            }
            Ok(())
        };
        let exchange = async {
            let (written, output) = tokio::join!(write_prompt, child.wait_with_output());
            written?;
            output
        };

        let output = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result.map_err(io_error)?,
            Err(_) => return Err(AiError::TimedOut(self.timeout)),
        };

        if !output.status.success() {
            return Err(AiError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        debug!(response_len = text.len(), "AI command completed");
        Ok(text)
    }
}

impl AiClient for CommandAiClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move { self.run(prompt).await.map_err(anyhow::Error::from) })
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
