//! Interaction mode detection.
//!
//! CI runners and agent sessions cannot answer prompts, so the presence of
//! their marker variables switches every command to accept-as-is behaviour.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Variables whose presence means no human is watching.
pub const AUTOMATION_VARIABLES: &[&str] = &["CI", "CLAUDE_CODE", "ANTHROPIC_API_KEY"];

/// Path of the controlling terminal on unix systems.
const TTY_PATH: &str = "/dev/tty";

/// Whether a command may prompt the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    /// A user can answer prompts.
    Interactive,
    /// Prompts are suppressed; the reason names the triggering variable.
    Automatic(String),
}

impl InteractionMode {
    /// Detects the mode from the process environment.
    pub fn detect() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Detects the mode from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in AUTOMATION_VARIABLES {
            let Some(value) = lookup(key) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if *key == "CI" && matches!(value.to_lowercase().as_str(), "false" | "0") {
                continue;
            }
            return InteractionMode::Automatic(format!("{key} is set"));
        }
        InteractionMode::Interactive
    }

    /// Returns whether prompts are allowed.
    pub fn is_interactive(&self) -> bool {
        matches!(self, InteractionMode::Interactive)
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionMode::Interactive => write!(f, "interactive"),
            InteractionMode::Automatic(reason) => write!(f, "automatic ({reason})"),
        }
    }
}

/// Opens the controlling terminal for reading.
///
/// Git hooks do not get the user's terminal on stdin, so prompts read from
/// `/dev/tty` directly. Returns `None` when there is no terminal.
pub fn open_terminal_input() -> Option<Box<dyn BufRead>> {
    match File::open(TTY_PATH) {
        Ok(tty) => Some(Box::new(BufReader::new(tty))),
        Err(e) => {
            tracing::debug!("No controlling terminal available: {e}");
            None
        }
    }
}

/// Returns a buffered reader over standard input.
pub fn stdin_input() -> Box<dyn BufRead> {
    Box::new(BufReader::new(io::stdin()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mode_from(pairs: &[(&str, &str)]) -> InteractionMode {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        InteractionMode::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn interactive_by_default() {
        assert_eq!(mode_from(&[]), InteractionMode::Interactive);
        assert!(mode_from(&[]).is_interactive());
    }

    #[test]
    fn ci_variable_suppresses_prompts() {
        let mode = mode_from(&[("CI", "true")]);
        assert_eq!(mode, InteractionMode::Automatic("CI is set".to_string()));
        assert!(!mode.is_interactive());
    }

    #[test]
    fn ci_false_does_not_count() {
        assert!(mode_from(&[("CI", "false")]).is_interactive());
        assert!(mode_from(&[("CI", "0")]).is_interactive());
        assert!(mode_from(&[("CI", "")]).is_interactive());
    }

    #[test]
    fn agent_variables_suppress_prompts() {
        assert_eq!(
            mode_from(&[("CLAUDE_CODE", "1")]),
            InteractionMode::Automatic("CLAUDE_CODE is set".to_string())
        );
        assert_eq!(
            mode_from(&[("ANTHROPIC_API_KEY", "sk-test")]),
            InteractionMode::Automatic("ANTHROPIC_API_KEY is set".to_string())
        );
    }

    #[test]
    fn display_includes_reason() {
        assert_eq!(InteractionMode::Interactive.to_string(), "interactive");
        assert_eq!(
            mode_from(&[("CI", "1")]).to_string(),
            "automatic (CI is set)"
        );
    }
}
