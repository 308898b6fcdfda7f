//! Font loading
//!
//! The default font ships inside the binary as a gzip-compressed,
//! base64-encoded FIGlet file. Named fonts are read from disk; a name that
//! does not exist falls back to the embedded font after a notification on
//! the reporter, every other failure is returned to the caller.

use crate::figlet::{FigletFont, FONT_EXTENSION};
use crate::report::ErrorReporter;
use crate::{CoreError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::GzDecoder;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory searched for fonts given by name
pub const DEFAULT_FONTS_DIR: &str = "/usr/share/howe";

/// FIGlet "Big" by Glenn Chappell
const DEFAULT_FONT: &str = include_str!("../assets/big.flf.gz.b64");

/// Decode the embedded default font into raw `.flf` bytes
pub fn load_default() -> Result<Vec<u8>> {
    let compressed = STANDARD.decode(DEFAULT_FONT.trim())?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(CoreError::FontDecompress)?;
    Ok(bytes)
}

/// Turns a font name or path into a parsed font
pub struct FontResolver {
    fonts_dir: PathBuf,
    reporter: Arc<dyn ErrorReporter>,
    owner: String,
}

impl FontResolver {
    pub fn new(fonts_dir: impl Into<PathBuf>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            reporter,
            owner: "font".to_string(),
        }
    }

    /// Prefix used for notifications sent to the reporter
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// Where a non-empty font spec is looked up
    pub fn font_path(&self, spec: &str) -> PathBuf {
        let mut path = PathBuf::from(spec);
        // Any dot in the final component counts as an extension, dotfiles included
        let has_extension = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains('.'));
        if !has_extension {
            let mut name = path.into_os_string();
            name.push(".");
            name.push(FONT_EXTENSION);
            path = PathBuf::from(name);
        }
        if path.is_absolute() {
            path
        } else {
            self.fonts_dir.join(path)
        }
    }

    /// Load the font named by `spec`; an empty spec selects the embedded font
    pub async fn resolve(&self, spec: &str) -> Result<FigletFont> {
        if spec.is_empty() {
            return Self::resolve_default();
        }

        let path = self.font_path(spec);
        tracing::debug!("Loading font from {}", path.display());

        match tokio::fs::read(&path).await {
            Ok(bytes) => FigletFont::from_bytes(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.reporter.report(format!(
                    "{}: Falling back to default font due to error: {}: {}",
                    self.owner,
                    path.display(),
                    e
                ));
                Self::resolve_default()
            }
            Err(source) => Err(CoreError::FontRead { path, source }),
        }
    }

    fn resolve_default() -> Result<FigletFont> {
        let bytes = load_default()?;
        FigletFont::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figlet::{render, Alignment};
    use crate::report::ErrorCollector;
    use pretty_assertions::assert_eq;

    fn resolver(dir: &Path) -> (FontResolver, Arc<ErrorCollector>) {
        let collector = Arc::new(ErrorCollector::new());
        let resolver = FontResolver::new(dir, collector.clone()).with_owner("banner");
        (resolver, collector)
    }

    fn draw(font: &FigletFont, text: &str) -> String {
        render(text, font, 80, font.layout(), Alignment::Left)
    }

    #[test]
    fn test_default_font_decodes() {
        let bytes = load_default().unwrap();
        assert!(bytes.starts_with(b"flf2a$ 8 6"));
    }

    #[test]
    fn test_default_font_decode_is_deterministic() {
        let first = load_default().unwrap();
        let second = load_default().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_font_parses() {
        let font = FigletFont::from_bytes(&load_default().unwrap()).unwrap();
        assert_eq!(font.height(), 8);
        assert_eq!(font.hardblank(), '$');
        assert!(font.layout().is_smushing());
        assert!(font.has_glyph('Ä'));
    }

    #[test]
    fn test_font_path_normalisation() {
        let (resolver, _) = resolver(Path::new(DEFAULT_FONTS_DIR));
        assert_eq!(resolver.font_path("big"), PathBuf::from("/usr/share/howe/big.flf"));
        assert_eq!(resolver.font_path("big.flf"), PathBuf::from("/usr/share/howe/big.flf"));
        assert_eq!(resolver.font_path("/opt/fonts/slant"), PathBuf::from("/opt/fonts/slant.flf"));
        assert_eq!(resolver.font_path("sub/small.tlf"), PathBuf::from("/usr/share/howe/sub/small.tlf"));
    }

    #[test]
    fn test_font_path_dotfile_keeps_name() {
        let (resolver, _) = resolver(Path::new(DEFAULT_FONTS_DIR));
        assert_eq!(resolver.font_path(".hidden"), PathBuf::from("/usr/share/howe/.hidden"));
        assert_eq!(resolver.font_path("v1.2/big"), PathBuf::from("/usr/share/howe/v1.2/big.flf"));
    }

    #[tokio::test]
    async fn test_empty_spec_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, collector) = resolver(dir.path());
        let font = resolver.resolve("").await.unwrap();
        assert_eq!(font.height(), 8);
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_missing_font_falls_back_once() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, collector) = resolver(dir.path());

        let fallback = resolver.resolve("nonexistent-font").await.unwrap();
        let default = resolver.resolve("").await.unwrap();

        assert_eq!(draw(&fallback, "hi"), draw(&default, "hi"));
        let messages = collector.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("banner: Falling back to default font due to error:"));
        assert!(messages[0].contains("nonexistent-font.flf"));
    }

    #[tokio::test]
    async fn test_named_font_in_fonts_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.flf"), load_default().unwrap()).unwrap();
        let (resolver, collector) = resolver(dir.path());

        let font = resolver.resolve("big").await.unwrap();
        assert_eq!(font.height(), 8);
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy.flf");
        std::fs::write(&path, load_default().unwrap()).unwrap();
        let (resolver, _) = resolver(Path::new("/nowhere"));

        let font = resolver.resolve(path.to_str().unwrap()).await.unwrap();
        assert_eq!(font.height(), 8);
    }

    #[tokio::test]
    async fn test_unreadable_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.flf")).unwrap();
        let (resolver, collector) = resolver(dir.path());

        let err = resolver.resolve("folder").await.unwrap_err();
        assert!(matches!(err, CoreError::FontRead { .. }));
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_header_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("huge.flf"), "flf2a$ 1 1 1 0 2000000000\n").unwrap();
        let (resolver, collector) = resolver(dir.path());

        let err = resolver.resolve("huge").await.unwrap_err();
        assert!(matches!(err, CoreError::FontParse(_)));
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_font_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.flf"), "not a font").unwrap();
        let (resolver, _) = resolver(dir.path());

        let err = resolver.resolve("broken").await.unwrap_err();
        assert!(matches!(err, CoreError::FontParse(_)));
    }
}
