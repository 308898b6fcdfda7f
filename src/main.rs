//! Howe - a terminal greeter built from widgets
//!
//! ```text
//!  _
//! | |__   _____      _____
//! | '_ \ / _ \ \ /\ / / _ \
//! | | | | (_) \ V  V /  __/
//! |_| |_|\___/ \_/\_/ \___|
//! ```

use clap::Parser;
use howe_config::Config;
use howe_core::ErrorCollector;
use howe_widgets::{banner, Banner, Payload, WidgetRegistry, WidgetRequest};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Howe - render configured widgets, or a single banner
#[derive(Parser, Debug)]
#[command(name = "howe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Render this text as a banner instead of the configured widgets
    text: Option<String>,

    /// Font name or path for the banner
    #[arg(short = 'f', long, requires = "text")]
    font: Option<String>,

    /// Banner colour (red, green, yellow, blue, magenta, cyan, white, rainbow)
    #[arg(short = 'C', long, requires = "text")]
    color: Option<String>,

    /// Directory searched for named fonts
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// Requests to run, in output order
    fn requests(&self, config: &Config) -> Vec<WidgetRequest> {
        let Some(text) = &self.text else {
            return config
                .widgets
                .iter()
                .map(|w| WidgetRequest::new(w.kind.clone(), w.payload.clone()))
                .collect();
        };

        let mut payload = Payload::new();
        payload.insert("text".into(), Value::String(text.clone()));
        if let Some(font) = &self.font {
            payload.insert("font".into(), Value::String(font.clone()));
        }
        if let Some(color) = &self.color {
            payload.insert("color".into(), Value::String(color.clone()));
        }
        vec![WidgetRequest::new(banner::NAME, payload)]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so widget output stays clean
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("howe={}", log_level)),
        ))
        .init();

    tracing::debug!("Starting Howe v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.fonts_dir {
        config.general.fonts_dir = dir.clone();
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let collector = Arc::new(ErrorCollector::new());
    let registry = WidgetRegistry::new();
    registry.register(
        banner::NAME,
        Arc::new(Banner::new(&config.general.fonts_dir, collector.clone())),
    );

    let requests = args.requests(&config);
    if requests.is_empty() {
        tracing::info!("No widgets configured");
    }

    let plain = std::env::var_os("NO_COLOR").is_some();
    let mut failed = false;
    for output in registry.run(requests).await {
        match output {
            Ok(text) if plain => println!("{}", howe_core::strip_ansi(&text)),
            Ok(text) => println!("{}", text),
            Err(e) => {
                failed = true;
                eprintln!("error: {}", e);
            }
        }
    }

    for message in collector.drain() {
        eprintln!("{}", message);
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arg_parsing() {
        let args = Args::try_parse_from(["howe"]).unwrap();
        assert!(args.text.is_none());
        assert!(!args.debug);
        assert!(!args.print_config);
    }

    #[test]
    fn test_arg_parsing_with_options() {
        let args = Args::try_parse_from([
            "howe",
            "hello",
            "--font",
            "slant",
            "--color",
            "rainbow",
            "--fonts-dir",
            "/tmp/fonts",
        ])
        .unwrap();
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert_eq!(args.font.as_deref(), Some("slant"));
        assert_eq!(args.color.as_deref(), Some("rainbow"));
        assert_eq!(args.fonts_dir, Some(PathBuf::from("/tmp/fonts")));
    }

    #[test]
    fn test_font_requires_text() {
        assert!(Args::try_parse_from(["howe", "--font", "big"]).is_err());
    }

    #[test]
    fn test_single_banner_request() {
        let args = Args::try_parse_from(["howe", "hi", "-C", "red"]).unwrap();
        let requests = args.requests(&Config::default());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, "banner");
        assert_eq!(requests[0].payload["text"], "hi");
        assert_eq!(requests[0].payload["color"], "red");
        assert!(!requests[0].payload.contains_key("font"));
    }

    #[test]
    fn test_configured_requests() {
        let config: Config = toml::from_str(
            r#"
            [[widgets]]
            type = "banner"
            text = "one"

            [[widgets]]
            type = "banner"
            command = "hostname"
            color = "rainbow"
            "#,
        )
        .unwrap();
        let args = Args::try_parse_from(["howe"]).unwrap();
        let requests = args.requests(&config);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].payload["command"], "hostname");
    }
}
