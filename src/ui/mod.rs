//! Terminal output helpers
//!
//! Uses `cliclack` log lines when attached to an interactive terminal and
//! falls back to plain `[TAG] message` lines for pipes and CI.

use console::style;
use std::io::IsTerminal;

/// Output mode for the current process
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    fancy: bool,
}

impl UiContext {
    /// Detect from the environment
    pub fn detect() -> Self {
        let ci = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "JENKINS_URL", "TF_BUILD"]
            .iter()
            .any(|var| std::env::var_os(var).is_some());

        Self {
            fancy: std::io::stdout().is_terminal() && !ci,
        }
    }
}

/// Severity of a step line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Level {
    fn tag(self) -> console::StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Info => style("[INFO]").cyan(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
        }
    }
}

/// Print a titled banner
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.fancy {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Print a section heading
pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.fancy {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// Print a single step line
pub fn step(ctx: &UiContext, level: Level, message: &str) {
    if ctx.fancy {
        let _ = match level {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
            Level::Fail => cliclack::log::error(message),
        };
    } else {
        println!("  {} {}", level.tag(), message);
    }
}

/// Print a step line with a dimmed hint
pub fn step_hint(ctx: &UiContext, level: Level, message: &str, hint: &str) {
    step(ctx, level, &format!("{} - {}", message, style(hint).dim()));
}

/// Print an indented `key: value` pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.fancy {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Print a dimmed remark
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.fancy {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}
