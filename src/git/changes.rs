//! Collection of staged and branch changes for prompts.

use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffFormat, DiffOptions};
use tracing::debug;

use crate::git::GitRepository;

/// A changed file and its status letter (`A`, `M`, `D`, `R`, `C`, `T`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Status letter in `git diff --name-status` style.
    pub status: char,
    /// Path relative to the repository root (new path for renames).
    pub path: String,
}

/// File list plus line statistics for a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Changed files in diff order.
    pub files: Vec<FileChange>,
    /// Added lines.
    pub insertions: usize,
    /// Removed lines.
    pub deletions: usize,
}

impl ChangeSummary {
    /// Returns whether the diff touched no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Renders a `--name-status` style listing followed by a totals line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(&format!("{}\t{}\n", file.status, file.path));
        }
        out.push_str(&format!(
            "{} file{} changed, {} insertion{}(+), {} deletion{}(-)",
            self.files.len(),
            plural(self.files.len()),
            self.insertions,
            plural(self.insertions),
            self.deletions,
            plural(self.deletions),
        ));
        out
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Unified diff text, possibly cut short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffText {
    /// Patch text, truncated at a line boundary.
    pub patch: String,
    /// Whether the byte cap was reached.
    pub truncated: bool,
}

/// Everything staged for the next commit.
#[derive(Debug, Clone, Default)]
pub struct StagedChanges {
    /// Staged files and line counts.
    pub summary: ChangeSummary,
    /// Staged patch.
    pub diff: DiffText,
}

/// A commit on the branch being proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Full commit hash.
    pub hash: String,
    /// First line of the message.
    pub subject: String,
    /// Remaining message text, trimmed.
    pub body: String,
}

impl CommitSummary {
    /// Returns the abbreviated hash.
    pub fn short_hash(&self) -> &str {
        let len = crate::git::SHORT_HASH_LEN.min(self.hash.len());
        &self.hash[..len]
    }
}

/// The commits and combined diff of a branch relative to its base.
#[derive(Debug, Clone, Default)]
pub struct BranchChanges {
    /// Commits in `base..HEAD`, oldest first, merges skipped.
    pub commits: Vec<CommitSummary>,
    /// Files and line counts from the merge base to HEAD.
    pub summary: ChangeSummary,
    /// Patch from the merge base to HEAD.
    pub diff: DiffText,
}

impl GitRepository {
    /// Collects the changes staged in the index relative to HEAD.
    pub fn staged_changes(&self, max_diff_bytes: usize) -> Result<StagedChanges> {
        let repo = self.repository();
        let head_tree = self.head_tree()?;

        let mut opts = DiffOptions::new();
        opts.ignore_submodules(true);
        let mut diff = repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
            .context("Failed to diff HEAD against the index")?;
        diff.find_similar(None)
            .context("Failed to detect renames in staged changes")?;

        let summary = summarize(&diff)?;
        let diff = render_patch(&diff, max_diff_bytes)?;
        debug!(
            files = summary.files.len(),
            patch_len = diff.patch.len(),
            truncated = diff.truncated,
            "Collected staged changes"
        );

        Ok(StagedChanges { summary, diff })
    }

    /// Collects commits and the combined diff of HEAD relative to `base_ref`.
    pub fn branch_changes(&self, base_ref: &str, max_diff_bytes: usize) -> Result<BranchChanges> {
        let repo = self.repository();

        let base_commit = repo
            .revparse_single(base_ref)
            .with_context(|| format!("Failed to resolve base '{base_ref}'"))?
            .peel_to_commit()
            .context("Failed to peel base to commit")?;
        let head_commit = repo
            .head()
            .context("Failed to get HEAD")?
            .peel_to_commit()
            .context("Failed to peel HEAD to commit")?;

        let commits = self.commits_between(base_commit.id(), head_commit.id())?;

        let merge_base = repo
            .merge_base(base_commit.id(), head_commit.id())
            .with_context(|| format!("No common ancestor between HEAD and '{base_ref}'"))?;
        let base_tree = repo
            .find_commit(merge_base)
            .context("Failed to find merge base commit")?
            .tree()
            .context("Failed to read merge base tree")?;
        let head_tree = head_commit.tree().context("Failed to read HEAD tree")?;

        let mut diff = repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)
            .context("Failed to diff branch against base")?;
        diff.find_similar(None)
            .context("Failed to detect renames in branch changes")?;

        let summary = summarize(&diff)?;
        let diff = render_patch(&diff, max_diff_bytes)?;

        Ok(BranchChanges {
            commits,
            summary,
            diff,
        })
    }

    fn commits_between(&self, base: git2::Oid, head: git2::Oid) -> Result<Vec<CommitSummary>> {
        let repo = self.repository();
        let mut walker = repo.revwalk().context("Failed to create revwalk")?;
        walker.push(head).context("Failed to push HEAD commit")?;
        walker.hide(base).context("Failed to hide base commit")?;

        let mut commits = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = repo.find_commit(oid).context("Failed to find commit")?;

            // Skip merge commits
            if commit.parent_count() > 1 {
                continue;
            }

            let message = commit.message().unwrap_or_default();
            let (subject, body) = split_message(message);
            commits.push(CommitSummary {
                hash: oid.to_string(),
                subject,
                body,
            });
        }

        // Reverse to get chronological order (oldest first)
        commits.reverse();
        Ok(commits)
    }
}

/// Splits a commit message into its subject line and trimmed body.
pub(crate) fn split_message(message: &str) -> (String, String) {
    let mut lines = message.trim().splitn(2, '\n');
    let subject = lines.next().unwrap_or_default().trim().to_string();
    let body = lines.next().unwrap_or_default().trim().to_string();
    (subject, body)
}

fn status_letter(delta: Delta) -> char {
    match delta {
        Delta::Added => 'A',
        Delta::Deleted => 'D',
        Delta::Modified => 'M',
        Delta::Renamed => 'R',
        Delta::Copied => 'C',
        Delta::Typechange => 'T',
        _ => '?',
    }
}

fn summarize(diff: &Diff<'_>) -> Result<ChangeSummary> {
    let files = diff
        .deltas()
        .map(|delta| {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            FileChange {
                status: status_letter(delta.status()),
                path,
            }
        })
        .collect();

    let stats = diff.stats().context("Failed to compute diff stats")?;

    Ok(ChangeSummary {
        files,
        insertions: stats.insertions(),
        deletions: stats.deletions(),
    })
}

/// Renders a diff as patch text, stopping at the last line that fits in
/// `max_bytes`.
fn render_patch(diff: &Diff<'_>, max_bytes: usize) -> Result<DiffText> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut truncated = false;

    let result = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let prefix = match line.origin() {
            origin @ ('+' | '-' | ' ') => Some(origin as u8),
            _ => None,
        };
        let needed = line.content().len() + usize::from(prefix.is_some());
        if buffer.len() + needed > max_bytes {
            truncated = true;
            return false;
        }
        if let Some(prefix) = prefix {
            buffer.push(prefix);
        }
        buffer.extend_from_slice(line.content());
        true
    });

    if let Err(e) = result {
        if !truncated {
            return Err(e).context("Failed to render diff");
        }
    }

    Ok(DiffText {
        patch: String::from_utf8_lossy(&buffer).into_owned(),
        truncated,
    })
}
