//! Git remote operations and base branch resolution

use anyhow::{Context, Result};
use git2::Repository;

use crate::git::GitRepository;

/// Branch names tried, in order, when a remote has no symbolic HEAD.
const COMMON_MAIN_BRANCHES: [&str; 3] = ["main", "master", "develop"];

/// Remote repository information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Name of the remote (e.g., "origin", "upstream")
    pub name: String,
    /// URI of the remote repository
    pub uri: String,
    /// Detected main branch name for this remote, if any
    pub main_branch: Option<String>,
}

impl RemoteInfo {
    /// Get all remotes for a repository
    pub fn get_all_remotes(repo: &Repository) -> Result<Vec<Self>> {
        let mut remotes = Vec::new();
        let remote_names = repo.remotes().context("Failed to get remote names")?;

        for name in remote_names.iter().flatten() {
            if let Ok(remote) = repo.find_remote(name) {
                let uri = remote.url().unwrap_or("").to_string();
                let main_branch = Self::detect_main_branch(repo, name);

                remotes.push(RemoteInfo {
                    name: name.to_string(),
                    uri,
                    main_branch,
                });
            }
        }

        Ok(remotes)
    }

    /// Returns the remote named `origin`, or the first remote.
    pub fn primary(remotes: &[RemoteInfo]) -> Option<&RemoteInfo> {
        remotes
            .iter()
            .find(|r| r.name == "origin")
            .or_else(|| remotes.first())
    }

    /// Detect the main branch for a remote
    ///
    /// Only the symbolic HEAD and the common default names count; an arbitrary
    /// pushed branch is never treated as the remote's default.
    fn detect_main_branch(repo: &Repository, remote_name: &str) -> Option<String> {
        // refs/remotes/<remote>/HEAD is set by clone and `git remote set-head`
        let head_ref_name = format!("refs/remotes/{remote_name}/HEAD");
        if let Ok(head_ref) = repo.find_reference(&head_ref_name) {
            if let Some(target) = head_ref.symbolic_target() {
                if let Some(branch_name) =
                    target.strip_prefix(&format!("refs/remotes/{remote_name}/"))
                {
                    return Some(branch_name.to_string());
                }
            }
        }

        for branch_name in COMMON_MAIN_BRANCHES {
            let reference_name = format!("refs/remotes/{remote_name}/{branch_name}");
            if repo.find_reference(&reference_name).is_ok() {
                return Some(branch_name.to_string());
            }
        }

        None
    }
}

/// The branch a pull request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseBranch {
    /// Revision used for git operations, e.g. `origin/main` or `main`.
    pub reference: String,
    /// Plain branch name passed to `gh pr create --base`, e.g. `main`.
    pub name: String,
    /// Remote the base lives on, if it is a remote-tracking branch.
    pub remote: Option<String>,
}

impl BaseBranch {
    fn remote(remote: &str, name: &str) -> Self {
        Self {
            reference: format!("{remote}/{name}"),
            name: name.to_string(),
            remote: Some(remote.to_string()),
        }
    }

    fn local(name: &str) -> Self {
        Self {
            reference: name.to_string(),
            name: name.to_string(),
            remote: None,
        }
    }
}

impl GitRepository {
    /// Returns the name of the remote PR branches are pushed to.
    pub fn primary_remote_name(&self) -> Result<Option<String>> {
        let remotes = RemoteInfo::get_all_remotes(self.repository())?;
        Ok(RemoteInfo::primary(&remotes).map(|r| r.name.clone()))
    }

    /// Resolves the base branch for a pull request.
    ///
    /// An explicit `requested` branch may be given as `main` or `origin/main`.
    /// Without one, the primary remote's default branch is used, then a local
    /// `main` or `master`.
    pub fn resolve_base_branch(&self, requested: Option<&str>) -> Result<BaseBranch> {
        let remotes = RemoteInfo::get_all_remotes(self.repository())?;
        let primary = RemoteInfo::primary(&remotes);

        if let Some(branch) = requested {
            // Already remote-qualified, e.g. "origin/main"
            for remote in &remotes {
                if let Some(name) = branch.strip_prefix(&format!("{}/", remote.name)) {
                    if self.branch_exists_on_remote(name, &remote.name) {
                        return Ok(BaseBranch::remote(&remote.name, name));
                    }
                }
            }
            if let Some(remote) = primary {
                if self.branch_exists_on_remote(branch, &remote.name) {
                    return Ok(BaseBranch::remote(&remote.name, branch));
                }
            }
            if self.local_branch_exists(branch) {
                return Ok(BaseBranch::local(branch));
            }
            anyhow::bail!("Base branch '{branch}' does not exist locally or on any remote");
        }

        if let Some(remote) = primary {
            if let Some(main_branch) = &remote.main_branch {
                if self.branch_exists_on_remote(main_branch, &remote.name) {
                    return Ok(BaseBranch::remote(&remote.name, main_branch));
                }
            }
        }

        for name in ["main", "master"] {
            if self.local_branch_exists(name) {
                return Ok(BaseBranch::local(name));
            }
        }

        anyhow::bail!(
            "Could not determine the base branch. Run 'git fetch' or pass --base <BRANCH>."
        )
    }
}
