//! Commit message file handling.
//!
//! Git hands the hook a file that may already hold a user message, comment
//! lines (status hints), and with `commit -v` a diff below a scissors line.
//! Only the user message is ever replaced; the rest is written back verbatim.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

/// Text git places after the comment character on the scissors line.
pub const SCISSORS: &str = "------------------------ >8 ------------------------";

/// Default comment character when `core.commentChar` is unset.
pub const DEFAULT_COMMENT_CHAR: char = '#';

/// The parts of a commit message file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessageFile {
    user_lines: Vec<String>,
    trailer_lines: Vec<String>,
}

impl CommitMessageFile {
    /// Splits file contents into user text and git-owned lines.
    pub fn parse(contents: &str, comment_char: char) -> Self {
        let mut file = Self::default();
        let mut lines = contents.lines();

        while let Some(line) = lines.next() {
            if is_scissors(line, comment_char) {
                file.trailer_lines.push(line.to_string());
                file.trailer_lines.extend(lines.by_ref().map(str::to_string));
                break;
            }
            if line.starts_with(comment_char) {
                file.trailer_lines.push(line.to_string());
            } else {
                file.user_lines.push(line.to_string());
            }
        }

        file
    }

    /// Reads a commit message file; a missing file is treated as empty.
    pub fn read(path: &Path, comment_char: char) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents, comment_char)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read commit message file: {}", path.display())),
        }
    }

    /// Returns the user-written message, trimmed.
    pub fn user_message(&self) -> String {
        self.user_lines.join("\n").trim().to_string()
    }

    /// Returns the file contents with the user message replaced.
    pub fn compose(&self, message: &str) -> String {
        let mut out = message.trim().to_string();
        out.push('\n');
        if !self.trailer_lines.is_empty() {
            out.push('\n');
            for line in &self.trailer_lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Writes the composed contents to `path`.
    pub fn write_with_message(&self, path: &Path, message: &str) -> Result<()> {
        fs::write(path, self.compose(message))
            .with_context(|| format!("Failed to write commit message file: {}", path.display()))
    }
}

/// Removes comment lines and everything below a scissors line.
pub fn strip_comments(text: &str, comment_char: char) -> String {
    CommitMessageFile::parse(text, comment_char).user_message()
}

fn is_scissors(line: &str, comment_char: char) -> bool {
    line.strip_prefix(comment_char)
        .is_some_and(|rest| rest.trim() == SCISSORS)
}
