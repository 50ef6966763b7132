//! The `prepare-commit-msg` git hook.
//!
//! The hook never blocks a commit: once the repository is open, every failure
//! is reported and the message file is left for git to use as-is.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use crate::ai::prompts::{build_commit_prompt, CommitPromptInput};
use crate::ai::response::parse_commit_message;
use crate::ai::{AiClient, CommandAiClient};
use crate::cli::formatting::format_prompt_fallback;
use crate::cli::review::{edit_commit_message, ReviewDecision, ReviewSession};
use crate::config::HelperConfig;
use crate::data::CommitMessageFile;
use crate::git::{GitRepository, RECENT_SUBJECT_LIMIT};
use crate::utils::environment::open_terminal_input;
use crate::utils::InteractionMode;

/// Arguments git passes to the `prepare-commit-msg` hook.
#[derive(Parser, Debug, Clone)]
pub struct PrepareCommitMsgCommand {
    /// Path to the commit message file.
    pub commit_msg_file: PathBuf,
    /// Source of the message: message, template, merge, squash or commit.
    pub commit_source: Option<String>,
    /// Commit object name, given when the source is `commit`.
    pub sha: Option<String>,
}

/// Where the commit message came from, as reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSource {
    /// `-m` or `-F` was given.
    Message,
    /// `-t` or `commit.template` supplied a template.
    Template,
    /// A merge is being committed.
    Merge,
    /// `.git/SQUASH_MSG` exists.
    Squash,
    /// `--amend`, `-c` or `-C` reuses an existing commit.
    Commit,
    /// Any value git may add in the future.
    Other(String),
}

impl CommitSource {
    /// Parses the optional second hook argument.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|s| !s.is_empty()).map(|s| match s {
            "message" => Self::Message,
            "template" => Self::Template,
            "merge" => Self::Merge,
            "squash" => Self::Squash,
            "commit" => Self::Commit,
            other => Self::Other(other.to_string()),
        })
    }

    /// Whether git already prepared a message the hook must not replace.
    pub fn keeps_existing_message(&self) -> bool {
        matches!(self, Self::Merge | Self::Squash | Self::Commit)
    }
}

/// What the hook did with the message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Nothing was attempted; the reason is logged.
    Skipped(String),
    /// A generated message was written.
    Written(String),
    /// The user rejected the generated message.
    Rejected,
    /// The AI CLI failed; the file was left untouched.
    AiFailed,
    /// Reading the repository or the message file failed; the file was left
    /// untouched.
    Failed(String),
}

impl PrepareCommitMsgCommand {
    /// Executes the hook.
    pub async fn execute(self) -> Result<()> {
        let config = match HelperConfig::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("⚠️  git-ai-helpers: {e:#}; skipping AI commit message");
                return Ok(());
            }
        };

        let source = CommitSource::parse(self.commit_source.as_deref());
        if let Some(reason) = skip_reason(&config, source.as_ref()) {
            debug!("Skipping commit message generation: {reason}");
            return Ok(());
        }

        let repo = GitRepository::open()?;
        let client = match CommandAiClient::from_config(&config) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("⚠️  git-ai-helpers: {e}; skipping AI commit message");
                return Ok(());
            }
        };

        let mut mode = InteractionMode::detect();
        let terminal = if mode.is_interactive() {
            open_terminal_input()
        } else {
            None
        };
        if terminal.is_none() && mode.is_interactive() {
            mode = InteractionMode::Automatic("no terminal".to_string());
        }
        debug!(%mode, "Running prepare-commit-msg hook");

        let mut review = terminal
            .map(|input| ReviewSession::new(input, io::stderr(), config.editor_command()));

        let outcome = self
            .run(&repo, &config, &client, source.as_ref(), review.as_mut())
            .await?;
        debug!(?outcome, "Hook finished");
        Ok(())
    }

    /// Generates a message and applies it to the message file.
    ///
    /// Without a review session the generated message is written directly.
    /// Errors are reported on stderr and returned as [`HookOutcome::Failed`]
    /// so that git still commits.
    pub async fn run<C, R, W>(
        &self,
        repo: &GitRepository,
        config: &HelperConfig,
        client: &C,
        source: Option<&CommitSource>,
        review: Option<&mut ReviewSession<R, W>>,
    ) -> Result<HookOutcome>
    where
        C: AiClient + ?Sized,
        R: BufRead,
        W: Write,
    {
        match self.generate(repo, config, client, source, review).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!("prepare-commit-msg hook failed: {e:#}");
                eprintln!("⚠️  git-ai-helpers: {e:#}; the commit message was not changed.");
                Ok(HookOutcome::Failed(format!("{e:#}")))
            }
        }
    }

    async fn generate<C, R, W>(
        &self,
        repo: &GitRepository,
        config: &HelperConfig,
        client: &C,
        source: Option<&CommitSource>,
        review: Option<&mut ReviewSession<R, W>>,
    ) -> Result<HookOutcome>
    where
        C: AiClient + ?Sized,
        R: BufRead,
        W: Write,
    {
        let comment_char = repo.comment_char();
        let file = CommitMessageFile::read(&self.commit_msg_file, comment_char)?;

        let staged = repo
            .staged_changes(config.max_diff_bytes)
            .context("Failed to collect staged changes")?;
        if staged.summary.is_empty() {
            return Ok(HookOutcome::Skipped("nothing staged".to_string()));
        }

        let user_message = match source {
            Some(CommitSource::Message) => Some(file.user_message()).filter(|m| !m.is_empty()),
            _ => None,
        };
        let branch = repo.get_current_branch().unwrap_or_else(|e| {
            debug!("Using HEAD as branch name: {e}");
            "HEAD".to_string()
        });
        let recent_subjects = repo
            .recent_subjects(RECENT_SUBJECT_LIMIT)
            .context("Failed to read recent commit subjects")?;

        let prompt = build_commit_prompt(&CommitPromptInput {
            branch: &branch,
            recent_subjects: &recent_subjects,
            staged: &staged,
            user_message: user_message.as_deref(),
        });

        eprintln!("🤖 Generating commit message with {}...", client.describe());
        let generated = client
            .complete(&prompt)
            .await
            .and_then(|raw| parse_commit_message(&raw).map_err(anyhow::Error::from));
        let message = match generated {
            Ok(message) => message,
            Err(e) => {
                warn!("Commit message generation failed: {e:#}");
                eprintln!("{}", format_prompt_fallback(&e, &prompt));
                if user_message.is_some() {
                    eprintln!("↩️  Keeping your original commit message.");
                }
                return Ok(HookOutcome::AiFailed);
            }
        };

        let message = match review {
            None => message,
            Some(session) => {
                let decision = session.run(
                    message,
                    |draft: &String| draft.clone(),
                    |draft: &String, editor: &str| edit_commit_message(editor, draft, comment_char),
                )
                .context("Failed to review the generated message")?;
                match decision {
                    ReviewDecision::Accept(message) => message,
                    ReviewDecision::Reject => {
                        eprintln!("❌ Generated message rejected; the commit message was not changed.");
                        return Ok(HookOutcome::Rejected);
                    }
                }
            }
        };

        file.write_with_message(&self.commit_msg_file, &message)?;
        Ok(HookOutcome::Written(message))
    }
}

/// Returns why the hook should not run, if it should not.
fn skip_reason(config: &HelperConfig, source: Option<&CommitSource>) -> Option<String> {
    if config.skip_hook {
        return Some("AI_HELPER_SKIP is set".to_string());
    }
    match source {
        Some(source) if source.keeps_existing_message() => {
            Some(format!("commit source is {source:?}"))
        }
        _ => None,
    }
}
