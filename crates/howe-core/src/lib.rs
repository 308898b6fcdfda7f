//! # Howe Core
//!
//! Everything a banner needs between a request and its styled output.
//!
//! This crate provides:
//! - FIGlet font parsing and block-letter rendering
//! - The embedded default font and named-font resolution with fallback
//! - The colour palette, including the rainbow gradient
//! - A side channel for non-fatal errors
//!
//! ```text
//!  _
//! | |__   _____      _____
//! | '_ \ / _ \ \ /\ / / _ \
//! | | | | (_) \ V  V /  __/
//! |_| |_|\___/ \_/\_/ \___|
//! ```

pub mod error;
pub mod figlet;
pub mod font;
pub mod palette;
pub mod rainbow;
pub mod report;

pub use error::{CoreError, Result};
pub use figlet::{render, Alignment, FigletFont, Layout, PrintDirection, FONT_EXTENSION};
pub use font::{load_default, FontResolver, DEFAULT_FONTS_DIR};
pub use palette::{colorize, strip_ansi, AnsiColor, Style, DEFAULT_COLOR};
pub use rainbow::{ColorDepth, Rainbow};
pub use report::{ErrorCollector, ErrorReporter};

/// Widest line a banner may occupy, in columns
pub const MAX_LINE_WIDTH: usize = 80;
