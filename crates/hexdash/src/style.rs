//! Semantic terminal styles.
//!
//! Pure mappings from what a piece of text *means* to how it looks. The
//! only runtime input is whether color is enabled at all, carried by
//! [`Palette`].

use std::io::{self, IsTerminal};

use hexdash_api::ProcessStatus;
use owo_colors::{OwoColorize, Style};

use crate::cli::ColorMode;

/// What a span of output represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Banner frame.
    Frame,
    /// Banner title text.
    Title,
    /// Section headings.
    Heading,
    /// Metric labels.
    Label,
    /// Process identifiers.
    Emphasis,
    Success,
    Failure,
    Warning,
    Info,
}

/// Terminal style for a tone.
pub fn style(tone: Tone) -> Style {
    match tone {
        Tone::Frame => Style::new().purple(),
        Tone::Title => Style::new().cyan().bold(),
        Tone::Heading | Tone::Info => Style::new().blue(),
        Tone::Label | Tone::Success => Style::new().green(),
        Tone::Emphasis => Style::new().white().bold(),
        Tone::Failure => Style::new().red(),
        Tone::Warning => Style::new().yellow().bold(),
    }
}

/// Tone for a process status tag.
pub fn status_tone(status: &ProcessStatus) -> Tone {
    match status {
        ProcessStatus::Running => Tone::Success,
        ProcessStatus::Failed => Tone::Failure,
        ProcessStatus::Other(_) => Tone::Warning,
    }
}

/// Decide whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Applies tones when color is on, passes text through when it is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(self, tone: Tone, text: impl std::fmt::Display) -> String {
        if self.enabled {
            text.style(style(tone)).to_string()
        } else {
            text.to_string()
        }
    }
}
