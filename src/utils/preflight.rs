//! Preflight validation checks for early failure detection
//!
//! Commands call these before gathering context so a missing tool is reported
//! before any slow work starts.

use std::process::Command;

use anyhow::{bail, Context, Result};

/// Validate we're in a valid git repository
pub fn check_git_repository() -> Result<()> {
    crate::git::GitRepository::open().context(
        "Not in a git repository. Please run this command from within a git repository.",
    )?;
    Ok(())
}

/// Validate GitHub CLI is available
///
/// Only checks that `gh` runs; authentication problems surface with gh's own
/// message when the PR is created.
pub fn check_github_cli() -> Result<()> {
    match Command::new("gh").arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => bail!(
            "GitHub CLI (gh) is installed but not working: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(_) => bail!(
            "GitHub CLI (gh) is not installed or not in PATH.\n\
             Please install it from https://cli.github.com/"
        ),
    }
}
