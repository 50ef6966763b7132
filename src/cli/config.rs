//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::HelperConfig;
use crate::utils::{InteractionMode, Settings};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the resolved configuration and interaction mode.
    Show(ShowCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let config = HelperConfig::load()?;
        println!("{config}");
        println!("Interaction:     {}", InteractionMode::detect());
        if let Ok(path) = Settings::get_settings_path() {
            let state = if path.exists() { "" } else { " (not present)" };
            println!("Settings file:   {}{state}", path.display());
        }
        Ok(())
    }
}
