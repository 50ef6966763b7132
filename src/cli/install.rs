//! Installing and removing the `prepare-commit-msg` hook.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::git::GitRepository;

/// File name of the hook git runs.
pub const HOOK_NAME: &str = "prepare-commit-msg";

/// Line identifying hooks written by this tool.
pub const HOOK_MARKER: &str = "# Installed by git-ai-helpers";

/// Install options.
#[derive(Parser, Debug, Clone)]
pub struct InstallCommand {
    /// Replaces an existing hook not written by this tool.
    #[arg(long)]
    pub force: bool,
}

/// Uninstall options.
#[derive(Parser, Debug, Clone)]
pub struct UninstallCommand {}

/// Result of removing the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// Our hook was removed.
    Removed(PathBuf),
    /// No hook file exists.
    NotInstalled,
    /// A hook exists but was not written by this tool; it was kept.
    Foreign(PathBuf),
}

impl InstallCommand {
    /// Executes the install command.
    pub fn execute(self) -> Result<()> {
        let repo = GitRepository::open()?;
        let hooks_dir = repo.hooks_dir()?;
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;

        let path = install_hook(&hooks_dir, &exe, self.force)?;
        println!("✅ Installed {HOOK_NAME} hook: {}", path.display());
        Ok(())
    }
}

impl UninstallCommand {
    /// Executes the uninstall command.
    pub fn execute(self) -> Result<()> {
        let repo = GitRepository::open()?;
        match uninstall_hook(&repo.hooks_dir()?)? {
            UninstallOutcome::Removed(path) => {
                println!("🗑️  Removed {HOOK_NAME} hook: {}", path.display());
            }
            UninstallOutcome::NotInstalled => println!("ℹ️  No {HOOK_NAME} hook installed."),
            UninstallOutcome::Foreign(path) => println!(
                "⚠️  {} was not installed by git-ai-helpers; leaving it in place.",
                path.display()
            ),
        }
        Ok(())
    }
}

/// Returns the shell shim that forwards git's hook arguments to `exe`.
pub fn hook_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n{HOOK_MARKER}\nexec {} {HOOK_NAME} \"$@\"\n",
        shell_quote(&exe.to_string_lossy())
    )
}

/// Writes the hook into `hooks_dir`.
///
/// An existing hook without [`HOOK_MARKER`] is only replaced when `force`
/// is set.
pub fn install_hook(hooks_dir: &Path, exe: &Path, force: bool) -> Result<PathBuf> {
    let path = hooks_dir.join(HOOK_NAME);

    match fs::read_to_string(&path) {
        Ok(existing) if !existing.contains(HOOK_MARKER) && !force => bail!(
            "{} already exists and was not installed by git-ai-helpers; rerun with --force to replace it",
            path.display()
        ),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    }

    fs::create_dir_all(hooks_dir)
        .with_context(|| format!("Failed to create {}", hooks_dir.display()))?;
    fs::write(&path, hook_script(exe))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    make_executable(&path)?;

    Ok(path)
}

/// Removes the hook from `hooks_dir` if this tool installed it.
pub fn uninstall_hook(hooks_dir: &Path) -> Result<UninstallOutcome> {
    let path = hooks_dir.join(HOOK_NAME);
    let existing = match fs::read_to_string(&path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(UninstallOutcome::NotInstalled),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    if !existing.contains(HOOK_MARKER) {
        return Ok(UninstallOutcome::Foreign(path));
    }

    fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(UninstallOutcome::Removed(path))
}

/// Single-quotes a value for `/bin/sh`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("Failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
