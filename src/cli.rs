//! CLI interface for git-ai-helpers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod config;
pub mod formatting;
pub mod hook;
pub mod install;
pub mod pr;
pub mod review;

/// git-ai-helpers: AI-written commit messages and pull requests.
#[derive(Parser)]
#[command(name = "git-ai-helpers")]
#[command(about = "AI-written commit messages and pull requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generates a pull request with the AI CLI and opens it with gh.
    Pr(pr::AiPrCommand),
    /// Runs the prepare-commit-msg hook logic.
    #[command(name = "prepare-commit-msg")]
    PrepareCommitMsg(hook::PrepareCommitMsgCommand),
    /// Installs the prepare-commit-msg hook into the current repository.
    Install(install::InstallCommand),
    /// Removes a hook previously installed by this tool.
    Uninstall(install::UninstallCommand),
    /// Configuration information.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Pr(pr_cmd) => pr_cmd.execute().await,
            Commands::PrepareCommitMsg(hook_cmd) => hook_cmd.execute().await,
            Commands::Install(install_cmd) => install_cmd.execute(),
            Commands::Uninstall(uninstall_cmd) => uninstall_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

/// Installs the tracing subscriber shared by every binary.
///
/// Honours `RUST_LOG`, defaults to `warn`, and writes to stderr so logs never
/// mix with command output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

/// Prints an error and its causes to stderr.
pub fn report_error(e: &anyhow::Error) {
    eprintln!("Error: {e}");
    for cause in e.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
