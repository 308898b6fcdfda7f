//! Helpers shared by widgets

use async_trait::async_trait;
use howe_core::{CoreError, Result};
use serde_json::Value;

/// Request payload handed to a widget
pub type Payload = serde_json::Map<String, Value>;

/// Read an optional string field, rejecting any other type
pub fn optional_string(payload: &Payload, field: &str) -> Result<Option<String>> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CoreError::invalid_field(field)),
    }
}

/// Produces the literal text a widget should display
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn text(&self, widget: &str, payload: &Payload) -> Result<String>;
}

/// Uses the `text` field verbatim, or runs `command` through `sh -c`
/// and uses its standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOrCommand;

#[async_trait]
impl TextSource for TextOrCommand {
    async fn text(&self, widget: &str, payload: &Payload) -> Result<String> {
        let text = if let Some(text) = optional_string(payload, "text")? {
            text
        } else if let Some(command) = optional_string(payload, "command")? {
            run_command(widget, &command).await?
        } else {
            return Err(CoreError::TextExtraction(format!(
                "{}: either text or command must be specified",
                widget
            )));
        };

        if text.is_empty() {
            return Err(CoreError::TextExtraction(format!(
                "{}: nothing to display",
                widget
            )));
        }
        Ok(text)
    }
}

async fn run_command(widget: &str, command: &str) -> Result<String> {
    tracing::debug!("{}: running {:?}", widget, command);
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|e| CoreError::TextExtraction(format!("{}: failed to run command: {}", widget, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CoreError::TextExtraction(format!(
            "{}: command failed ({}): {}",
            widget,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end_matches(['\n', '\r'])
        .to_string())
}
