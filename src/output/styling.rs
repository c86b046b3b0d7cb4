use console::{style, StyledObject};
use std::fmt::Display;

/// Text roles used by the step inventory output.
///
/// Callers pick a role rather than a color so the report stays consistent.
pub fn title(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bold().underlined()
}

pub fn label(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

/// Identifiers such as slugs, names and repository URLs
pub fn identity(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn count(n: usize) -> StyledObject<String> {
    style(n.to_string()).yellow().bold()
}

pub fn phase_running(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).yellow()
}

pub fn phase_done(text: impl Display) -> StyledObject<String> {
    style(format!("{text} ✓")).green()
}

pub fn notice(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).yellow().italic()
}
