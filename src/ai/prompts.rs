//! Prompt templates for commit messages and pull request descriptions

use crate::git::{BranchChanges, DiffText, StagedChanges};

/// Conventional commit rules included in every commit prompt.
const COMMIT_GUIDELINES: &str = r#"## Commit Message Format

```
<type>(<optional scope>): <description>

[optional body]
```

## Types
- `feat`: New features or enhancements
- `fix`: Bug fixes
- `docs`: Documentation changes
- `style`: Formatting only
- `refactor`: Code restructuring without behaviour change
- `test`: Adding or updating tests
- `chore`: Maintenance tasks, dependency updates
- `ci`: CI/CD pipeline changes
- `perf`: Performance improvements
- `build`: Build system or external dependency changes

## Guidelines
- Subject line at most 72 characters, imperative mood ("add" not "added")
- No period at the end of the subject
- Blank line between subject and body
- Wrap the body at 72 characters; explain what changed and why, not how
- Omit the body for trivial changes
- If the recent commits use a different convention, follow theirs instead"#;

/// Instructions for commit message generation
const COMMIT_INSTRUCTIONS: &str = r#"You are an expert software engineer writing a git commit message for the staged changes below.

Base the message on what the diff actually does. File paths and branch names are hints, not the source of truth."#;

/// Required answer shape for commit messages
const COMMIT_RESPONSE_FORMAT: &str = r#"RESPONSE FORMAT: Reply with the commit message wrapped in <commit_message> tags and nothing else, for example:

<commit_message>
fix(parser): handle empty input without panicking

Return an empty document instead of indexing into the first line.
</commit_message>"#;

/// Instructions for PR description generation
const PR_INSTRUCTIONS: &str = r#"You are an expert software engineer writing a GitHub pull request for the branch below.

Analyze the commits and the diff to understand what the branch accomplishes as a whole, then write:
- a concise title (ideally 50-72 characters, conventional commit style when the commits use it)
- a markdown body that explains what changed and why, lists the notable changes as bullet points, and mentions anything reviewers should pay attention to (breaking changes, migrations, follow-ups)

If a PR template is provided, fill it in: replace placeholder text and comments with real content and tick the checkboxes that apply."#;

/// Required answer shape for PRs
const PR_RESPONSE_FORMAT: &str = r#"RESPONSE FORMAT: Reply with exactly these two tagged sections and nothing else:

<title>Your concise PR title</title>
<body>
Your markdown PR description.
</body>"#;

/// Inputs for a commit message prompt.
#[derive(Debug, Clone, Copy)]
pub struct CommitPromptInput<'a> {
    /// Branch being committed to.
    pub branch: &'a str,
    /// Recent commit subjects, newest first.
    pub recent_subjects: &'a [String],
    /// Staged changes.
    pub staged: &'a StagedChanges,
    /// Message the user already supplied with `-m`/`-F`.
    pub user_message: Option<&'a str>,
}

/// Inputs for a pull request prompt.
#[derive(Debug, Clone, Copy)]
pub struct PrPromptInput<'a> {
    /// Branch the PR is opened from.
    pub branch: &'a str,
    /// Branch the PR targets.
    pub base: &'a str,
    /// Commits and diff of the branch.
    pub changes: &'a BranchChanges,
    /// Repository PR template, if any.
    pub template: Option<&'a str>,
    /// Free-form context from the command line.
    pub additional_context: Option<&'a str>,
}

/// Builds the prompt for a commit message.
pub fn build_commit_prompt(input: &CommitPromptInput<'_>) -> String {
    let mut prompt = String::from(COMMIT_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(COMMIT_GUIDELINES);
    prompt.push_str("\n\n");

    push_section(&mut prompt, "branch", input.branch);

    if !input.recent_subjects.is_empty() {
        push_section(
            &mut prompt,
            "recent_commits",
            &input.recent_subjects.join("\n"),
        );
    }

    push_section(&mut prompt, "staged_files", &input.staged.summary.render());

    if let Some(message) = input.user_message.filter(|m| !m.trim().is_empty()) {
        prompt.push_str(
            "The author already wrote the message below. Keep its intent and wording where it is accurate, and improve it using the diff.\n",
        );
        push_section(&mut prompt, "user_message", message.trim());
    }

    push_diff(&mut prompt, &input.staged.diff);

    prompt.push_str(COMMIT_RESPONSE_FORMAT);
    prompt
}

/// Builds the prompt for a pull request title and description.
pub fn build_pr_prompt(input: &PrPromptInput<'_>) -> String {
    let mut prompt = String::from(PR_INSTRUCTIONS);
    prompt.push_str("\n\n");

    push_section(&mut prompt, "branch", input.branch);
    push_section(&mut prompt, "base", input.base);

    let commits = input
        .changes
        .commits
        .iter()
        .map(|c| {
            let mut entry = format!("- {} {}", c.short_hash(), c.subject);
            if !c.body.is_empty() {
                for line in c.body.lines() {
                    entry.push_str("\n    ");
                    entry.push_str(line);
                }
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n");
    push_section(&mut prompt, "commits", &commits);

    push_section(&mut prompt, "diff_stat", &input.changes.summary.render());

    if let Some(template) = input.template.filter(|t| !t.trim().is_empty()) {
        push_section(&mut prompt, "pr_template", template.trim());
    }

    if let Some(context) = input.additional_context.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(
            "The author added the following context. Treat it as authoritative about intent.\n",
        );
        push_section(&mut prompt, "additional_context", context.trim());
    }

    push_diff(&mut prompt, &input.changes.diff);

    prompt.push_str(PR_RESPONSE_FORMAT);
    prompt
}

fn push_section(prompt: &mut String, tag: &str, content: &str) {
    prompt.push_str(&format!("<{tag}>\n{content}\n</{tag}>\n\n"));
}

fn push_diff(prompt: &mut String, diff: &DiffText) {
    if diff.truncated {
        prompt.push_str(
            "NOTE: The diff was truncated to fit the prompt. Use the file list for the full scope of the change.\n",
        );
    }
    let patch = diff.patch.trim_end();
    push_section(prompt, "diff", patch);
}
