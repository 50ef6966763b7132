//! Resolved runtime configuration.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::utils::settings::Settings;

/// Default AI CLI command line.
pub const DEFAULT_AI_COMMAND: &str = "claude -p";

/// Default AI CLI timeout in seconds.
///
/// Large diffs with slow models can take minutes; this caps a hung process.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of diff bytes included in a prompt.
pub const DEFAULT_MAX_DIFF_BYTES: usize = 60_000;

/// Editor used when none of the editor variables is set.
pub const FALLBACK_EDITOR: &str = "vi";

/// Configuration shared by the commit hook and the PR command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperConfig {
    /// AI CLI command line, split on whitespace before spawning.
    pub ai_command: String,
    /// Model passed to the AI CLI as `--model <model>`.
    pub model: Option<String>,
    /// Maximum time to wait for the AI CLI.
    pub timeout: Duration,
    /// Maximum diff bytes embedded in a prompt.
    pub max_diff_bytes: usize,
    /// Explicit editor command, if configured.
    pub editor: Option<String>,
    /// Whether `ai-pr` opens PRs as drafts unless told otherwise.
    pub draft_by_default: bool,
    /// Whether the commit hook should do nothing.
    pub skip_hook: bool,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            ai_command: DEFAULT_AI_COMMAND.to_string(),
            model: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_diff_bytes: DEFAULT_MAX_DIFF_BYTES,
            editor: None,
            draft_by_default: true,
            skip_hook: false,
        }
    }
}

impl HelperConfig {
    /// Loads configuration from the environment with settings-file fallback.
    pub fn load() -> Result<Self> {
        let settings = Settings::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable settings file: {e:#}");
            Settings::default()
        });
        Self::from_lookup(settings.lookup())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ai_command = non_empty("AI_HELPER_COMMAND").unwrap_or(defaults.ai_command);
        let model = non_empty("AI_HELPER_MODEL");

        let timeout = match non_empty("AI_HELPER_TIMEOUT") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid AI_HELPER_TIMEOUT value '{raw}'"))?,
            ),
            None => defaults.timeout,
        };

        let max_diff_bytes = match non_empty("AI_HELPER_MAX_DIFF_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid AI_HELPER_MAX_DIFF_BYTES value '{raw}'"))?,
            None => defaults.max_diff_bytes,
        };

        let editor = non_empty("AI_HELPER_EDITOR")
            .or_else(|| non_empty("EDITOR"))
            .or_else(|| non_empty("VISUAL"));

        let draft_by_default = non_empty("AI_HELPER_DRAFT_PR")
            .and_then(|v| parse_bool_string(&v))
            .unwrap_or(defaults.draft_by_default);

        let skip_hook = non_empty("AI_HELPER_SKIP")
            .and_then(|v| parse_bool_string(&v))
            .unwrap_or(false);

        Ok(Self {
            ai_command,
            model,
            timeout,
            max_diff_bytes,
            editor,
            draft_by_default,
            skip_hook,
        })
    }

    /// Returns the editor command to launch for the Edit action.
    pub fn editor_command(&self) -> &str {
        self.editor.as_deref().unwrap_or(FALLBACK_EDITOR)
    }
}

impl fmt::Display for HelperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI command:      {}", self.ai_command)?;
        writeln!(
            f,
            "Model:           {}",
            self.model.as_deref().unwrap_or("(AI CLI default)")
        )?;
        writeln!(f, "Timeout:         {}s", self.timeout.as_secs())?;
        writeln!(f, "Max diff bytes:  {}", self.max_diff_bytes)?;
        writeln!(f, "Editor:          {}", self.editor_command())?;
        writeln!(f, "Draft PRs:       {}", self.draft_by_default)?;
        write!(f, "Hook skipped:    {}", self.skip_hook)
    }
}

/// Parses a boolean-like string value.
///
/// Accepts "true"/"1"/"yes" as `true` and "false"/"0"/"no" as `false`.
/// Returns `None` for unrecognized values.
pub fn parse_bool_string(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
