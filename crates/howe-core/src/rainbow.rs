//! Rainbow gradient painter
//!
//! Colours each visible character from three phase-shifted sine waves. The
//! phase advances with the column and shifts by one step per line, which
//! gives the familiar diagonal `lolcat` gradient.

use crate::palette::RESET;
use std::f64::consts::PI;

/// Escape flavour used for gradient colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    /// 256-colour palette (`38;5;n`)
    #[default]
    Ansi256,
    /// 24-bit colour (`38;2;r;g;b`)
    TrueColor,
}

/// Gradient settings
#[derive(Debug, Clone, Copy)]
pub struct Rainbow {
    /// How fast the colour cycles
    pub frequency: f64,
    /// Columns per phase step
    pub spread: f64,
    /// Starting phase
    pub seed: f64,
    pub depth: ColorDepth,
}

impl Default for Rainbow {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            spread: 3.0,
            seed: 0.0,
            depth: ColorDepth::Ansi256,
        }
    }
}

impl Rainbow {
    /// Paint `text`, leaving whitespace and line structure untouched
    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 12);
        let mut painted = false;

        for (line_no, line) in text.split('\n').enumerate() {
            if line_no > 0 {
                out.push('\n');
            }
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    out.push(ch);
                    continue;
                }
                let (r, g, b) = self.color_at(line_no, col);
                match self.depth {
                    ColorDepth::Ansi256 => {
                        out.push_str(&format!("\x1b[38;5;{}m", rgb_to_ansi(r, g, b)))
                    }
                    ColorDepth::TrueColor => {
                        out.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b))
                    }
                }
                out.push(ch);
                painted = true;
            }
        }

        if painted {
            out.push_str(RESET);
        }
        out
    }

    fn color_at(&self, line: usize, col: usize) -> (u8, u8, u8) {
        let phase = self.frequency * (self.seed + line as f64 + col as f64 / self.spread);
        let channel = |offset: f64| ((phase + offset).sin() * 127.0 + 128.0) as u8;
        (channel(0.0), channel(2.0 * PI / 3.0), channel(4.0 * PI / 3.0))
    }
}

/// Convert RGB to nearest ANSI 256 color code
fn rgb_to_ansi(r: u8, g: u8, b: u8) -> u8 {
    // Use 6x6x6 color cube (colors 16-231)
    let r = (r as u32 * 5 / 255) as u8;
    let g = (g as u32 * 5 / 255) as u8;
    let b = (b as u32 * 5 / 255) as u8;
    16 + 36 * r + 6 * g + b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::strip_ansi;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rgb_to_ansi() {
        assert_eq!(rgb_to_ansi(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi(255, 255, 255), 231);
    }

    #[test]
    fn test_paint_preserves_text() {
        let text = "| |__  _\n| '_ \\| |\n";
        assert_eq!(strip_ansi(&Rainbow::default().paint(text)), text);
    }

    #[test]
    fn test_gradient_changes_across_columns() {
        let out = Rainbow::default().paint(&"#".repeat(40));
        let first = out.split('#').next().unwrap().to_string();
        let last = out.rsplit('#').nth(1).unwrap().to_string();
        assert_ne!(first, last);
    }

    #[test]
    fn test_whitespace_is_not_painted() {
        assert_eq!(Rainbow::default().paint("  \n "), "  \n ");
    }

    #[test]
    fn test_true_color_escapes() {
        let rainbow = Rainbow {
            depth: ColorDepth::TrueColor,
            ..Rainbow::default()
        };
        let out = rainbow.paint("x");
        assert!(out.starts_with("\x1b[38;2;"));
        assert!(out.ends_with("x\x1b[0m"));
    }

    #[test]
    fn test_paint_is_deterministic() {
        let rainbow = Rainbow::default();
        assert_eq!(rainbow.paint("howe"), rainbow.paint("howe"));
    }
}
