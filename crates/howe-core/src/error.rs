//! Error types for Howe Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Howe Core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// A request field has the wrong type
    #[error("{0}")]
    InvalidField(String),

    /// Color name is not part of the palette
    #[error("invalid color; valid values are {}", .valid.join(", "))]
    InvalidColor { valid: Vec<&'static str> },

    /// Embedded font payload is not valid base64
    #[error("failed to decode embedded font: {0}")]
    FontDecode(#[from] base64::DecodeError),

    /// Embedded font payload is not valid gzip
    #[error("failed to decompress embedded font: {0}")]
    FontDecompress(#[source] std::io::Error),

    /// Font bytes are not a valid FIGlet font
    #[error("failed to parse font: {0}")]
    FontParse(String),

    /// Font file exists but could not be read
    #[error("failed to read font {}: {source}", .path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Literal text could not be obtained from the request
    #[error("{0}")]
    TextExtraction(String),

    /// No widget registered under the requested name
    #[error("unknown widget: {0}")]
    UnknownWidget(String),

    /// Widget task ended without sending a result
    #[error("{0}: widget finished without producing output")]
    NoOutput(String),
}

impl CoreError {
    pub fn invalid_field(name: &str) -> Self {
        Self::InvalidField(format!("{} property must be a string", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_message() {
        assert_eq!(
            CoreError::invalid_field("font").to_string(),
            "font property must be a string"
        );
    }

    #[test]
    fn test_invalid_color_message() {
        let err = CoreError::InvalidColor {
            valid: vec!["red", "green"],
        };
        assert_eq!(err.to_string(), "invalid color; valid values are red, green");
    }
}
