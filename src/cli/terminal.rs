//! Terminal styling for command output

use std::fmt::Display;

use owo_colors::{OwoColorize, colors::css};

/// Widest separator line drawn under headings.
const MAX_RULE_WIDTH: usize = 48;

/// Detects whether colored output should be enabled
fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// A dimmed horizontal rule fitted to the terminal.
pub fn rule() -> String {
    let width = terminal_width().map_or(MAX_RULE_WIDTH, |w| usize::from(w).min(MAX_RULE_WIDTH));
    "─".repeat(width).dim()
}

/// Extension trait for styling anything printable
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Bold the text
    fn strong(&self) -> String;
}

impl<T: Display + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }

    fn strong(&self) -> String {
        paint(self, |s| s.bold().to_string())
    }
}

fn paint<T: Display + ?Sized>(value: &T, style: impl Fn(&str) -> String) -> String {
    let text = value.to_string();
    if supports_color() { style(&text) } else { text }
}
