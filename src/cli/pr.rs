//! The `ai-pr` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use crate::ai::prompts::{build_pr_prompt, PrPromptInput};
use crate::ai::response::parse_pr_response;
use crate::ai::{AiClient, CommandAiClient};
use crate::cli::formatting::{
    fallback_pr_body, format_draft_status, format_prompt_fallback, title_from_branch,
};
use crate::cli::review::{edit_pr_content, ReviewDecision, ReviewSession};
use crate::config::HelperConfig;
use crate::data::{write_yaml_file, PrContent};
use crate::git::{BaseBranch, BranchChanges, GitRepository};
use crate::github::{self, PrRequest};
use crate::utils::environment::stdin_input;
use crate::utils::{check_git_repository, check_github_cli, InteractionMode};

/// Generate a pull request title and description with the AI CLI and open
/// it with gh.
#[derive(Parser, Debug, Clone, Default)]
pub struct AiPrCommand {
    /// Extra context for the AI, e.g. motivation or "closes #42".
    #[arg(value_name = "ADDITIONAL_CONTEXT")]
    pub additional_context: Vec<String>,

    /// Base branch to target (defaults to the remote's default branch).
    #[arg(long, value_name = "BRANCH")]
    pub base: Option<String>,

    /// Creates the PR as ready for review.
    #[arg(long, conflicts_with = "draft")]
    pub ready: bool,

    /// Creates the PR as a draft.
    #[arg(long)]
    pub draft: bool,

    /// Skips the review menu and accepts the generated content.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Prints the generated PR without pushing or creating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Writes the generated PR to a YAML file instead of creating it.
    #[arg(long, value_name = "FILE", conflicts_with = "dry_run")]
    pub save_only: Option<PathBuf>,
}

/// Everything gathered from git before talking to the AI.
#[derive(Debug, Clone)]
pub struct PrPlan {
    /// Branch the PR is opened from.
    pub branch: String,
    /// Branch the PR targets.
    pub base: BaseBranch,
    /// Commits and diff ahead of the base.
    pub changes: BranchChanges,
    /// Repository PR template, if any.
    pub template: Option<String>,
}

impl PrPlan {
    /// Collects and validates the branch state.
    ///
    /// Fails on detached HEAD, when the current branch is the base branch,
    /// and when no commits are ahead of the base.
    pub fn collect(
        repo: &GitRepository,
        requested_base: Option<&str>,
        max_diff_bytes: usize,
    ) -> Result<Self> {
        let branch = repo
            .get_current_branch()
            .context("Cannot create a pull request from here")?;

        let base = repo.resolve_base_branch(requested_base)?;
        if branch == base.name {
            bail!(
                "Current branch '{branch}' is the base branch; switch to a feature branch first"
            );
        }

        let changes = repo.branch_changes(&base.reference, max_diff_bytes)?;
        if changes.commits.is_empty() {
            bail!("No commits on '{branch}' ahead of '{}'", base.reference);
        }

        let template = match repo.workdir() {
            Some(workdir) => github::read_pr_template(workdir)?.map(|(content, _)| content),
            None => None,
        };

        Ok(Self {
            branch,
            base,
            changes,
            template,
        })
    }

    /// Builds the AI prompt for this plan.
    pub fn prompt(&self, additional_context: Option<&str>) -> String {
        build_pr_prompt(&PrPromptInput {
            branch: &self.branch,
            base: &self.base.name,
            changes: &self.changes,
            template: self.template.as_deref(),
            additional_context,
        })
    }

    /// PR content used when the AI CLI cannot help.
    pub fn fallback_content(&self) -> PrContent {
        PrContent {
            title: title_from_branch(&self.branch),
            body: fallback_pr_body(&self.changes.commits),
        }
    }
}

impl AiPrCommand {
    /// Returns the free-form context joined into one string.
    fn context(&self) -> Option<String> {
        let joined = self.additional_context.join(" ");
        let joined = joined.trim();
        (!joined.is_empty()).then(|| joined.to_string())
    }

    /// Whether the PR should be opened as a draft.
    fn is_draft(&self, config: &HelperConfig) -> bool {
        if self.ready {
            false
        } else if self.draft {
            true
        } else {
            config.draft_by_default
        }
    }

    fn creates_pr(&self) -> bool {
        !self.dry_run && self.save_only.is_none()
    }

    /// Executes the command.
    pub async fn execute(self) -> Result<()> {
        let config = HelperConfig::load()?;
        let mode = InteractionMode::detect();
        debug!(%mode, "Running ai-pr");

        check_git_repository()?;
        if self.creates_pr() {
            check_github_cli()?;
        }

        let repo = GitRepository::open()?;
        let plan = PrPlan::collect(&repo, self.base.as_deref(), config.max_diff_bytes)?;

        println!("🌿 Branch: {}", plan.branch);
        println!("🎯 Base: {}", plan.base.reference);
        println!("📝 Commits: {}", plan.changes.commits.len());

        if self.creates_pr() {
            match github::existing_open_pr(&plan.branch) {
                Ok(Some(pr)) => {
                    println!(
                        "⚠️  An open pull request already exists for '{}': {}",
                        plan.branch, pr.url
                    );
                    return Ok(());
                }
                Ok(None) => {}
                Err(e) => warn!("Could not check for existing pull requests: {e:#}"),
            }
        }

        let client = CommandAiClient::from_config(&config)?;
        println!("🤖 Generating pull request with {}...", client.describe());
        let generated =
            generate_pr_content(&client, &plan, self.context().as_deref(), &mode).await?;
        let from_fallback = generated.from_fallback;
        let pr = generated.content;

        if self.dry_run {
            println!("\n📋 Title: {}\n\n{}", pr.title, pr.body);
            return Ok(());
        }

        if let Some(path) = &self.save_only {
            write_yaml_file(&pr, path)?;
            println!("💾 PR details saved to: {}", path.display());
            return Ok(());
        }

        let is_draft = self.is_draft(&config);
        let (status_icon, status_text) = format_draft_status(is_draft);
        println!("{status_icon} PR will be created as: {status_text}");

        let skip_review = self.yes || !mode.is_interactive();
        let pr = if skip_review {
            if let Some(warning) = unreviewed_fallback_warning(skip_review, from_fallback) {
                println!("{warning}");
            }
            pr
        } else {
            let mut session =
                ReviewSession::new(stdin_input(), std::io::stdout(), config.editor_command());
            match session.run(pr, render_pr, |draft: &PrContent, editor: &str| {
                edit_pr_content(editor, draft)
            })? {
                ReviewDecision::Accept(pr) => pr,
                ReviewDecision::Reject => {
                    println!("❌ Pull request creation cancelled.");
                    return Ok(());
                }
            }
        };

        push_if_needed(&repo, &plan)?;

        println!("🚀 Creating pull request ({status_text})...");
        let url = github::create_pr(&PrRequest {
            head: plan.branch.clone(),
            base: plan.base.name.clone(),
            title: pr.title,
            body: pr.body,
            draft: is_draft,
        })?;
        println!("🎉 Pull request created: {url}");
        Ok(())
    }
}

/// PR content and whether it came from the branch-derived fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPr {
    /// Title and body.
    pub content: PrContent,
    /// True when the AI failed and the content was derived from the branch.
    pub from_fallback: bool,
}

/// Asks the AI for PR content.
///
/// On failure the error and prompt are printed. Interactive runs continue
/// with content derived from the branch; automatic runs fail.
pub async fn generate_pr_content<C: AiClient + ?Sized>(
    client: &C,
    plan: &PrPlan,
    additional_context: Option<&str>,
    mode: &InteractionMode,
) -> Result<GeneratedPr> {
    let prompt = plan.prompt(additional_context);
    let generated = client
        .complete(&prompt)
        .await
        .and_then(|raw| parse_pr_response(&raw).map_err(anyhow::Error::from));

    match generated {
        Ok(content) => Ok(GeneratedPr {
            content,
            from_fallback: false,
        }),
        Err(e) => {
            eprintln!("{}", format_prompt_fallback(&e, &prompt));
            if mode.is_interactive() {
                eprintln!("↩️  Falling back to a title derived from the branch name.");
                Ok(GeneratedPr {
                    content: plan.fallback_content(),
                    from_fallback: true,
                })
            } else {
                Err(e.context("Failed to generate pull request content"))
            }
        }
    }
}

/// Warning shown when fallback content goes to `gh` without being reviewed.
fn unreviewed_fallback_warning(skip_review: bool, from_fallback: bool) -> Option<&'static str> {
    (skip_review && from_fallback).then_some(
        "⚠️  AI generation failed; creating the pull request from the branch-derived draft without review.",
    )
}

fn render_pr(pr: &PrContent) -> String {
    format!("📋 Title: {}\n\n{}", pr.title, pr.body)
}

/// Pushes the branch when the remote does not have it yet.
fn push_if_needed(repo: &GitRepository, plan: &PrPlan) -> Result<()> {
    let remote = match &plan.base.remote {
        Some(remote) => remote.clone(),
        None => repo
            .primary_remote_name()?
            .context("No git remote configured; add one before creating a pull request")?,
    };

    if repo.branch_exists_on_remote(&plan.branch, &remote) {
        debug!(branch = %plan.branch, %remote, "Branch already on remote");
        return Ok(());
    }

    println!("📤 Pushing branch to {remote}...");
    repo.push_branch(&plan.branch, &remote)
        .context("Failed to push branch to remote")
}
