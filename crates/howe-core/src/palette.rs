//! Colour palette and text styling
//!
//! Banner colours are a fixed set of eight names. Seven map to a single
//! ANSI foreground colour; `rainbow` paints a gradient instead.

use crate::rainbow::Rainbow;
use crate::{CoreError, Result};

/// Colour used when a request does not name one
pub const DEFAULT_COLOR: &str = "magenta";

/// ANSI escape code to reset all text formatting
pub const RESET: &str = "\x1b[0m";

/// Standard ANSI foreground colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    /// SGR parameter selecting this colour as foreground
    pub fn sgr(&self) -> u8 {
        match self {
            AnsiColor::Red => 31,
            AnsiColor::Green => 32,
            AnsiColor::Yellow => 33,
            AnsiColor::Blue => 34,
            AnsiColor::Magenta => 35,
            AnsiColor::Cyan => 36,
            AnsiColor::White => 37,
        }
    }
}

/// How rendered text gets coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// One foreground colour for the whole text
    Solid(AnsiColor),
    /// Gradient across columns and lines
    Rainbow,
}

impl Style {
    /// Every style in palette order
    pub fn all() -> &'static [Style] {
        &[
            Style::Solid(AnsiColor::Red),
            Style::Solid(AnsiColor::Green),
            Style::Solid(AnsiColor::Yellow),
            Style::Solid(AnsiColor::Blue),
            Style::Solid(AnsiColor::Magenta),
            Style::Solid(AnsiColor::Cyan),
            Style::Solid(AnsiColor::White),
            Style::Rainbow,
        ]
    }

    /// Name used in requests
    pub fn name(&self) -> &'static str {
        match self {
            Style::Solid(AnsiColor::Red) => "red",
            Style::Solid(AnsiColor::Green) => "green",
            Style::Solid(AnsiColor::Yellow) => "yellow",
            Style::Solid(AnsiColor::Blue) => "blue",
            Style::Solid(AnsiColor::Magenta) => "magenta",
            Style::Solid(AnsiColor::Cyan) => "cyan",
            Style::Solid(AnsiColor::White) => "white",
            Style::Rainbow => "rainbow",
        }
    }

    /// Look a colour up by name, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|style| style.name() == name)
            .ok_or_else(|| CoreError::InvalidColor {
                valid: Self::names(),
            })
    }

    /// All recognised colour names in palette order
    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(Style::name).collect()
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::Solid(AnsiColor::Magenta)
    }
}

/// Apply `style` to `text`
pub fn colorize(text: &str, style: Style) -> String {
    match style {
        Style::Rainbow => Rainbow::default().paint(text),
        Style::Solid(color) => format!("\x1b[{}m{}{}", color.sgr(), text, RESET),
    }
}

/// Remove CSI escape sequences, leaving only the visible text
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates run until a final byte in @..~
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}
