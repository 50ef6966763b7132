//! GitHub CLI (`gh`) integration.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error};

/// Locations searched for a pull request template, in order.
pub const PR_TEMPLATE_LOCATIONS: &[&str] = &[
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    "docs/pull_request_template.md",
    "pull_request_template.md",
    "PULL_REQUEST_TEMPLATE.md",
];

/// Everything `gh pr create` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRequest {
    /// Branch the PR is opened from.
    pub head: String,
    /// Branch the PR targets.
    pub base: String,
    /// PR title.
    pub title: String,
    /// PR description.
    pub body: String,
    /// Whether to open the PR as a draft.
    pub draft: bool,
}

/// An open pull request reported by `gh pr list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingPr {
    /// PR number.
    pub number: u64,
    /// PR web URL.
    pub url: String,
    /// PR state (`OPEN`, `MERGED`, `CLOSED`).
    #[serde(default)]
    pub state: String,
    /// PR title.
    #[serde(default)]
    pub title: String,
}

/// Returns the `gh` arguments for creating a PR.
pub fn build_create_args(request: &PrRequest) -> Vec<String> {
    let mut args = vec![
        "pr".to_string(),
        "create".to_string(),
        "--head".to_string(),
        request.head.clone(),
        "--base".to_string(),
        request.base.clone(),
        "--title".to_string(),
        request.title.clone(),
        "--body".to_string(),
        request.body.clone(),
    ];
    if request.draft {
        args.push("--draft".to_string());
    }
    args
}

/// Creates a pull request and returns its URL.
pub fn create_pr(request: &PrRequest) -> Result<String> {
    debug!(
        head = %request.head,
        base = %request.base,
        draft = request.draft,
        body_len = request.body.len(),
        "Creating PR with gh CLI"
    );

    let output = Command::new("gh")
        .args(build_create_args(request))
        .output()
        .context("Failed to create pull request")?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        error!("gh CLI failed to create PR: {}", error_msg);
        anyhow::bail!("Failed to create pull request: {}", error_msg.trim());
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!("PR created successfully with URL: {}", url);
    Ok(url)
}

/// Returns the first open pull request whose head is `branch`.
pub fn existing_open_pr(branch: &str) -> Result<Option<ExistingPr>> {
    let output = Command::new("gh")
        .args([
            "pr",
            "list",
            "--head",
            branch,
            "--state",
            "open",
            "--json",
            "number,url,state,title",
            "--limit",
            "1",
        ])
        .output()
        .context("Failed to execute gh command")?;

    if !output.status.success() {
        anyhow::bail!(
            "gh command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let prs = parse_pr_list(&String::from_utf8_lossy(&output.stdout))?;
    Ok(prs.into_iter().next())
}

/// Parses the JSON printed by `gh pr list --json number,url,state,title`.
pub fn parse_pr_list(json: &str) -> Result<Vec<ExistingPr>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).context("Failed to parse PR JSON from gh")
}

/// Reads the repository's pull request template, if one exists.
pub fn read_pr_template(workdir: &Path) -> Result<Option<(String, PathBuf)>> {
    for location in PR_TEMPLATE_LOCATIONS {
        let path = workdir.join(location);
        if path.is_file() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!(path = %path.display(), "Using PR template");
            return Ok(Some((content, path)));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn request(draft: bool) -> PrRequest {
        PrRequest {
            head: "feature/login".to_string(),
            base: "main".to_string(),
            title: "feat: add login".to_string(),
            body: "Adds a login form.".to_string(),
            draft,
        }
    }

    #[test]
    fn create_args_draft() {
        let args = build_create_args(&request(true));
        assert_eq!(
            args,
            [
                "pr",
                "create",
                "--head",
                "feature/login",
                "--base",
                "main",
                "--title",
                "feat: add login",
                "--body",
                "Adds a login form.",
                "--draft",
            ]
        );
    }

    #[test]
    fn create_args_ready() {
        let args = build_create_args(&request(false));
        assert!(!args.contains(&"--draft".to_string()));
    }

    #[test]
    fn parse_pr_list_entries() {
        let json = r#"[{"number":12,"url":"https://github.com/o/r/pull/12","state":"OPEN","title":"WIP"}]"#;
        let prs = parse_pr_list(json).unwrap();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].number, 12);
        assert_eq!(prs[0].url, "https://github.com/o/r/pull/12");
    }

    #[test]
    fn parse_pr_list_empty() {
        assert!(parse_pr_list("[]").unwrap().is_empty());
        assert!(parse_pr_list("  \n").unwrap().is_empty());
    }

    #[test]
    fn parse_pr_list_invalid() {
        assert!(parse_pr_list("not json").is_err());
    }

    #[test]
    fn template_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_pr_template(dir.path()).unwrap().is_none());

        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/pull_request_template.md"), "docs").unwrap();
        let (content, _) = read_pr_template(dir.path()).unwrap().unwrap();
        assert_eq!(content, "docs");

        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::write(
            dir.path().join(".github/pull_request_template.md"),
            "## Summary",
        )
        .unwrap();
        let (content, path) = read_pr_template(dir.path()).unwrap().unwrap();
        assert_eq!(content, "## Summary");
        assert!(path.ends_with(".github/pull_request_template.md"));
    }
}
