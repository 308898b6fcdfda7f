//! Banner widget
//!
//! Renders text as large block letters in a FIGlet font and colours the
//! result. Fonts are resolved on every request.

use crate::helpers::{optional_string, Payload, TextOrCommand, TextSource};
use crate::sync::Done;
use crate::{Widget, WidgetOutput};
use async_trait::async_trait;
use howe_core::{
    colorize, figlet, Alignment, ErrorReporter, FontResolver, Result, Style, DEFAULT_COLOR,
    MAX_LINE_WIDTH,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Name the banner widget is registered under
pub const NAME: &str = "banner";

pub struct Banner {
    fonts: FontResolver,
    text_source: Arc<dyn TextSource>,
}

impl Banner {
    pub fn new(fonts_dir: impl Into<PathBuf>, reporter: Arc<dyn ErrorReporter>) -> Self {
        let fonts = FontResolver::new(fonts_dir, reporter).with_owner(NAME);
        tracing::debug!("{}: named fonts load from {}", NAME, fonts.fonts_dir().display());
        Self {
            fonts,
            text_source: Arc::new(TextOrCommand),
        }
    }

    /// Replace how the literal text is obtained
    pub fn with_text_source(mut self, source: Arc<dyn TextSource>) -> Self {
        self.text_source = source;
        self
    }

    /// Produce the styled banner for one request, or the first error hit
    pub async fn render(&self, payload: &Payload) -> Result<String> {
        let text = self.text_source.text(NAME, payload).await?;
        let font_spec = optional_string(payload, "font")?.unwrap_or_default();
        let color = optional_string(payload, "color")?.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let style = Style::from_name(&color)?;

        let font = self.fonts.resolve(&font_spec).await?;
        tracing::debug!(
            "{}: rendering {} chars, font {:?}, style {}",
            NAME,
            text.chars().count(),
            font_spec,
            style.name()
        );

        let rendered = figlet::render(&text, &font, MAX_LINE_WIDTH, font.layout(), Alignment::Left);
        Ok(colorize(trim_one_newline(&rendered), style))
    }
}

/// Drop exactly one trailing newline, if present
fn trim_one_newline(rendered: &str) -> &str {
    rendered.strip_suffix('\n').unwrap_or(rendered)
}

#[async_trait]
impl Widget for Banner {
    async fn handle(&self, payload: Payload, output: mpsc::Sender<WidgetOutput>, done: Done) {
        let result = self.render(&payload).await;
        if let Err(e) = &result {
            tracing::debug!("{}: request failed: {}", NAME, e);
        }
        if output.send(result).await.is_err() {
            tracing::warn!("{}: output receiver dropped before result was delivered", NAME);
        }
        done.done();
    }
}
