//! Accept/edit/reject menu for generated drafts.

use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::cli::formatting::parse_editor_command;
use crate::data::{from_yaml, strip_comments, to_yaml, PrContent};

/// Outcome of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision<T> {
    /// The (possibly edited) draft was accepted.
    Accept(T),
    /// The user declined the draft.
    Reject,
}

/// Interactive review loop over arbitrary input and output streams.
pub struct ReviewSession<R, W> {
    input: R,
    output: W,
    editor: String,
}

impl<R: BufRead, W: Write> ReviewSession<R, W> {
    /// Creates a session that reads answers from `input` and writes to `output`.
    pub fn new(input: R, output: W, editor: impl Into<String>) -> Self {
        Self {
            input,
            output,
            editor: editor.into(),
        }
    }

    /// Shows `draft` and asks whether to accept, edit or reject it.
    ///
    /// Empty input accepts. End of input rejects. A failed edit is reported
    /// and the previous draft is kept.
    pub fn run<T, D, E>(&mut self, mut draft: T, render: D, mut edit: E) -> Result<ReviewDecision<T>>
    where
        D: Fn(&T) -> String,
        E: FnMut(&T, &str) -> Result<T>,
    {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "─────────────────────────────")?;
            writeln!(self.output, "{}", render(&draft))?;
            writeln!(self.output, "─────────────────────────────")?;

            let choice = loop {
                write!(self.output, "❓ [A]ccept, [E]dit, or [R]eject? [A/e/r] ")?;
                self.output.flush()?;

                let mut line = String::new();
                let read = self
                    .input
                    .read_line(&mut line)
                    .context("Failed to read user input")?;
                if read == 0 {
                    writeln!(self.output)?;
                    break Choice::Reject;
                }
                match parse_choice(&line) {
                    Some(choice) => break choice,
                    None => writeln!(
                        self.output,
                        "Invalid choice. Please enter 'a' to accept, 'e' to edit, or 'r' to reject."
                    )?,
                }
            };

            match choice {
                Choice::Accept => return Ok(ReviewDecision::Accept(draft)),
                Choice::Reject => return Ok(ReviewDecision::Reject),
                Choice::Edit => {
                    writeln!(self.output, "📝 Opening editor: {}", self.editor)?;
                    match edit(&draft, &self.editor) {
                        Ok(edited) => draft = edited,
                        Err(e) => {
                            writeln!(self.output, "⚠️  {e:#}")?;
                            writeln!(self.output, "   Keeping the previous draft.")?;
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Accept,
    Edit,
    Reject,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "" | "a" | "accept" | "y" | "yes" => Some(Choice::Accept),
        "e" | "edit" => Some(Choice::Edit),
        "r" | "reject" | "c" | "cancel" | "q" | "quit" | "n" | "no" => Some(Choice::Reject),
        _ => None,
    }
}

/// Opens `initial` in `editor` and returns the saved text.
///
/// The editor's stdin is attached to the controlling terminal when there is
/// one, since git hooks run with stdin closed.
pub fn edit_text(editor: &str, initial: &str, suffix: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("git-ai-helpers-")
        .suffix(suffix)
        .tempfile()
        .context("Failed to create temporary file for editing")?;
    file.write_all(initial.as_bytes())
        .context("Failed to write temporary file")?;
    file.flush().context("Failed to write temporary file")?;

    let (editor_cmd, args) = parse_editor_command(editor);
    if editor_cmd.is_empty() {
        bail!("No editor configured");
    }

    let mut command = Command::new(editor_cmd);
    command.args(args).arg(file.path());
    if let Ok(tty) = File::open("/dev/tty") {
        command.stdin(Stdio::from(tty));
    }

    debug!(editor, path = %file.path().display(), "Launching editor");
    let status = command
        .status()
        .with_context(|| format!("Failed to execute editor '{editor}'"))?;
    if !status.success() {
        bail!("Editor exited with non-zero status: {status}");
    }

    fs::read_to_string(file.path()).context("Failed to read edited file")
}

/// Edits a commit message as plain text.
pub fn edit_commit_message(editor: &str, message: &str, comment_char: char) -> Result<String> {
    let initial = format!(
        "{message}\n\n{comment_char} Edit the commit message above. Lines starting with '{comment_char}' are ignored.\n"
    );
    let edited = edit_text(editor, &initial, ".txt")?;
    let message = strip_comments(&edited, comment_char);
    if message.is_empty() {
        bail!("Edited commit message is empty");
    }
    Ok(message)
}

/// Edits PR content as YAML (`title:` and `body:` keys).
pub fn edit_pr_content(editor: &str, pr: &PrContent) -> Result<PrContent> {
    let edited = edit_text(editor, &to_yaml(pr)?, ".yaml")?;
    parse_edited_pr(&edited)
}

/// Parses edited PR YAML, rejecting an empty title.
pub(crate) fn parse_edited_pr(yaml: &str) -> Result<PrContent> {
    let mut pr: PrContent =
        from_yaml(yaml).context("Edited PR details are not valid YAML")?;
    pr.title = pr.title.trim().to_string();
    pr.body = pr.body.trim_end().to_string();
    if pr.title.is_empty() || pr.title.contains('\n') {
        bail!("Edited PR title must be a single non-empty line");
    }
    Ok(pr)
}
