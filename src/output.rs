//! # Output Configuration
//!
//! Controls how the command layer prints progress: emoji markers and colours
//! when the terminal supports them, bracketed plain-text markers otherwise.
//!
//! The following are honoured, in order:
//! - `--color=never|always|auto`
//! - `NO_COLOR` (any value, per https://no-color.org/)
//! - `CLICOLOR=0`
//! - `CLICOLOR_FORCE=1`, even when stdout is not a TTY
//! - `TERM=dumb`
//!
//! ```rust
//! use release_comb::output::{marker, OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("never");
//! assert_eq!(marker(&out, Status::Ok), "[OK]");
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the value of
    /// the `--color` flag (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kinds of progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scan,
    Step,
    Ok,
    Warn,
    Err,
    Info,
    DryRun,
}

/// The marker printed in front of a progress line.
pub fn marker(config: &OutputConfig, status: Status) -> &'static str {
    let (fancy, plain) = match status {
        Status::Scan => ("🔍", "[SCAN]"),
        Status::Step => ("➡️", "[STEP]"),
        Status::Ok => ("✅", "[OK]"),
        Status::Warn => ("⚠️", "[WARN]"),
        Status::Err => ("❌", "[ERR]"),
        Status::Info => ("📊", "[INFO]"),
        Status::DryRun => ("🔎", "[DRY RUN]"),
    };
    emoji(config, fancy, plain)
}

/// Returns `emoji_str` when colours are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Renders `text` in bold when colours are enabled.
pub fn bold(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).bold().force_styling(true).to_string()
    } else {
        text.to_string()
    }
}

/// Renders `text` dimmed when colours are enabled.
pub fn dim(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).dim().force_styling(true).to_string()
    } else {
        text.to_string()
    }
}
