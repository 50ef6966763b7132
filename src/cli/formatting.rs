//! Shared display formatting and utility functions for the CLI commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::git::CommitSummary;

/// A leading ticket key such as `ABC-123-` or `#42_`.
static TICKET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9]*-\d+|#?\d+)[-_/]*").unwrap());

/// Title used when nothing better can be derived.
const DEFAULT_PR_TITLE: &str = "Pull Request";

/// Splits an editor command string into the executable and its arguments.
///
/// Handles editors specified with arguments, e.g. `"code --wait"` becomes
/// `("code", vec!["--wait"])`.
pub(crate) fn parse_editor_command(editor: &str) -> (&str, Vec<&str>) {
    let mut parts = editor.split_whitespace();
    let cmd = parts.next().unwrap_or(editor);
    let args: Vec<&str> = parts.collect();
    (cmd, args)
}

/// Maps a branch prefix to a conventional commit type.
fn conventional_type(prefix: &str) -> Option<&'static str> {
    match prefix.to_lowercase().as_str() {
        "feat" | "feature" | "features" => Some("feat"),
        "fix" | "bugfix" | "hotfix" | "bug" => Some("fix"),
        "docs" | "doc" => Some("docs"),
        "chore" => Some("chore"),
        "refactor" => Some("refactor"),
        "test" | "tests" => Some("test"),
        "perf" => Some("perf"),
        "ci" => Some("ci"),
        "build" => Some("build"),
        "style" => Some("style"),
        _ => None,
    }
}

/// Derives a PR title from a branch name.
///
/// `feature/ABC-12-add-login` becomes `feat: add login`; a branch without a
/// recognised type prefix becomes a capitalised phrase (`add_login` becomes
/// `Add login`).
pub(crate) fn title_from_branch(branch: &str) -> String {
    let (kind, rest) = match branch.split_once('/') {
        Some((prefix, rest)) => match conventional_type(prefix) {
            Some(kind) => (Some(kind), rest),
            None => (None, branch.rsplit('/').next().unwrap_or(branch)),
        },
        None => (None, branch),
    };

    let rest = rest.rsplit('/').next().unwrap_or(rest);
    let rest = TICKET_PREFIX.replace(rest, "");
    let words = rest
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if words.is_empty() {
        return if branch.trim().is_empty() {
            DEFAULT_PR_TITLE.to_string()
        } else {
            branch.to_string()
        };
    }

    match kind {
        Some(kind) => format!("{kind}: {words}"),
        None => capitalize(&words),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds a PR body listing the branch's commits.
pub(crate) fn fallback_pr_body(commits: &[CommitSummary]) -> String {
    let mut output = String::from("## Commits\n\n");
    for commit in commits {
        output.push_str(&format!("- `{}` {}\n", commit.short_hash(), commit.subject));
    }
    output.trim_end().to_string()
}

/// Returns an (icon, label) pair for a PR's draft status.
pub(crate) fn format_draft_status(is_draft: bool) -> (&'static str, &'static str) {
    if is_draft {
        ("\u{1f4cb}", "draft")
    } else {
        ("\u{2705}", "ready for review")
    }
}

/// Formats the message shown when the AI CLI could not produce a result.
///
/// The prompt is included so it can be pasted into another tool by hand.
pub(crate) fn format_prompt_fallback(error: &anyhow::Error, prompt: &str) -> String {
    format!(
        "\u{274c} AI generation failed: {error:#}\n\
         \u{1f4cb} The prompt is below; paste it into your AI tool manually if you like.\n\
         ----- BEGIN PROMPT -----\n\
         {prompt}\n\
         ----- END PROMPT -----"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // --- parse_editor_command ---

    #[test]
    fn editor_with_args() {
        let (cmd, args) = parse_editor_command("code --wait --new-window");
        assert_eq!(cmd, "code");
        assert_eq!(args, vec!["--wait", "--new-window"]);
    }

    #[test]
    fn editor_simple() {
        let (cmd, args) = parse_editor_command("vim");
        assert_eq!(cmd, "vim");
        assert!(args.is_empty());
    }

    // --- title_from_branch ---

    #[test]
    fn title_conventional_prefix() {
        assert_eq!(title_from_branch("feature/add-login"), "feat: add login");
        assert_eq!(title_from_branch("hotfix/null_deref"), "fix: null deref");
        assert_eq!(title_from_branch("docs/readme"), "docs: readme");
    }

    #[test]
    fn title_strips_ticket() {
        assert_eq!(title_from_branch("feat/ABC-123-add-login"), "feat: add login");
        assert_eq!(title_from_branch("42-speed-up-ci"), "Speed up ci");
    }

    #[test]
    fn title_user_prefix() {
        assert_eq!(title_from_branch("alice/improve-logging"), "Improve logging");
    }

    #[test]
    fn title_plain_branch() {
        assert_eq!(title_from_branch("add_retry"), "Add retry");
    }

    #[test]
    fn title_only_ticket_keeps_branch() {
        assert_eq!(title_from_branch("ABC-123"), "ABC-123");
        assert_eq!(title_from_branch(""), "Pull Request");
    }

    // --- fallback_pr_body ---

    #[test]
    fn body_lists_commits() {
        let commits = vec![
            CommitSummary {
                hash: "abcdef1234567890".to_string(),
                subject: "feat: one".to_string(),
                body: String::new(),
            },
            CommitSummary {
                hash: "1234567890abcdef".to_string(),
                subject: "fix: two".to_string(),
                body: "details".to_string(),
            },
        ];
        assert_eq!(
            fallback_pr_body(&commits),
            "## Commits\n\n- `abcdef12` feat: one\n- `12345678` fix: two"
        );
    }

    // --- format_draft_status ---

    #[test]
    fn draft_status_true() {
        let (icon, text) = format_draft_status(true);
        assert_eq!(text, "draft");
        assert!(!icon.is_empty());
    }

    #[test]
    fn draft_status_false() {
        let (_, text) = format_draft_status(false);
        assert_eq!(text, "ready for review");
    }

    // --- format_prompt_fallback ---

    #[test]
    fn prompt_fallback_contains_error_and_prompt() {
        let err = anyhow::anyhow!("inner").context("AI command failed");
        let text = format_prompt_fallback(&err, "<diff>x</diff>");
        assert!(text.contains("AI command failed: inner"));
        assert!(text.contains("----- BEGIN PROMPT -----\n<diff>x</diff>\n----- END PROMPT -----"));
    }
}
