//! Git repository operations

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository, Tree};
use tracing::debug;

use crate::data::commit_message::DEFAULT_COMMENT_CHAR;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository for the current process.
    ///
    /// Honours `GIT_DIR` and friends, which git sets when running hooks, and
    /// otherwise searches upwards from the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::open_from_env().context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Directory git runs hooks from.
    ///
    /// Uses `core.hooksPath` when configured (relative values resolve against
    /// the working tree), otherwise `<git dir>/hooks`.
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let config = self.repo.config().context("Failed to read git config")?;
        if let Ok(custom) = config.get_path("core.hooksPath") {
            if custom.is_absolute() {
                return Ok(custom);
            }
            let base = self.workdir().unwrap_or_else(|| self.repo.path());
            return Ok(base.join(custom));
        }
        Ok(self.repo.path().join("hooks"))
    }

    /// Character git uses to mark comment lines in commit messages.
    ///
    /// Reads `core.commentChar`; unset, empty and `auto` fall back to `#`.
    pub fn comment_char(&self) -> char {
        self.repo
            .config()
            .and_then(|config| config.get_string("core.commentChar"))
            .ok()
            .filter(|value| value != "auto")
            .and_then(|value| value.chars().next())
            .unwrap_or(DEFAULT_COMMENT_CHAR)
    }

    /// Get current branch name
    ///
    /// Works on an unborn branch (before the first commit) by reading the
    /// symbolic target of `HEAD`.
    pub fn get_current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    if let Some(name) = head.shorthand() {
                        return Ok(name.to_string());
                    }
                }
                anyhow::bail!("Repository is in detached HEAD state")
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .context("Failed to read HEAD reference")?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string)
                    .context("HEAD does not point at a branch")
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    /// Returns the tree of the HEAD commit, or `None` on an unborn branch.
    pub fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_tree().context("Failed to peel HEAD to tree")?,
            )),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e).context("Failed to get HEAD"),
        }
    }

    /// Returns the subjects of the most recent commits on HEAD, newest first.
    pub fn recent_subjects(&self, limit: usize) -> Result<Vec<String>> {
        if self.head_tree()?.is_none() {
            return Ok(Vec::new());
        }

        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker.push_head().context("Failed to push HEAD")?;

        let mut subjects = Vec::with_capacity(limit);
        for oid in walker.take(limit) {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;
            subjects.push(commit.summary().unwrap_or_default().to_string());
        }

        Ok(subjects)
    }

    /// Check whether `refs/remotes/<remote>/<branch>` exists.
    pub fn branch_exists_on_remote(&self, branch: &str, remote: &str) -> bool {
        let reference = format!("refs/remotes/{remote}/{branch}");
        self.repo.find_reference(&reference).is_ok()
    }

    /// Check whether a local branch exists.
    pub fn local_branch_exists(&self, branch: &str) -> bool {
        self.repo
            .find_branch(branch, git2::BranchType::Local)
            .is_ok()
    }

    /// Push a branch and set its upstream using the git CLI.
    ///
    /// The CLI is used so the user's credential helpers and SSH agent apply.
    pub fn push_branch(&self, branch: &str, remote: &str) -> Result<()> {
        debug!(branch, remote, "Pushing branch with git CLI");
        let mut command = Command::new("git");
        if let Some(workdir) = self.workdir() {
            command.current_dir(workdir);
        }
        let output = command
            .args(["push", "--set-upstream", remote, branch])
            .output()
            .context("Failed to run git push")?;

        if !output.status.success() {
            anyhow::bail!(
                "git push failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}
