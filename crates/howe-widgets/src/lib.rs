//! # Howe Widgets
//!
//! The widget host protocol and the built-in widgets.
//!
//! A widget receives a request payload, an output channel and a completion
//! token. It must send exactly one result on the channel and then release
//! the token, on success and failure alike.

pub mod banner;
pub mod helpers;
pub mod sync;

pub use banner::Banner;
pub use helpers::{optional_string, Payload, TextOrCommand, TextSource};
pub use sync::{Done, WaitGroup};

use async_trait::async_trait;
use howe_core::CoreError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One widget result: rendered text or the reason it failed
pub type WidgetOutput = howe_core::Result<String>;

#[async_trait]
pub trait Widget: Send + Sync {
    /// Handle one request. Sends a single [`WidgetOutput`] on `output`, then
    /// releases `done`.
    async fn handle(&self, payload: Payload, output: mpsc::Sender<WidgetOutput>, done: Done);
}

/// A request addressed to a widget by name
#[derive(Debug, Clone)]
pub struct WidgetRequest {
    pub kind: String,
    pub payload: Payload,
}

impl WidgetRequest {
    pub fn new(kind: impl Into<String>, payload: Payload) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Widgets known to the host, by name
pub struct WidgetRegistry {
    widgets: RwLock<HashMap<String, Arc<dyn Widget>>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            widgets: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, name: impl Into<String>, widget: Arc<dyn Widget>) {
        let name = name.into();
        if self.widgets.write().insert(name.clone(), widget).is_some() {
            tracing::warn!("Replaced existing widget: {}", name);
        } else {
            tracing::debug!("Registered widget: {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Widget>> {
        self.widgets.read().get(name).cloned()
    }

    /// Registered widget names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.widgets.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Run every request concurrently and return the results in request order
    pub async fn run(&self, requests: Vec<WidgetRequest>) -> Vec<WidgetOutput> {
        let group = WaitGroup::new();
        let mut pending = Vec::with_capacity(requests.len());

        for request in requests {
            let (tx, rx) = mpsc::channel(1);
            match self.get(&request.kind) {
                Some(widget) => {
                    let done = group.add();
                    tokio::spawn(async move {
                        widget.handle(request.payload, tx, done).await;
                    });
                }
                None => {
                    tracing::warn!(
                        "No widget registered as {} (known: {})",
                        request.kind,
                        self.names().join(", ")
                    );
                    // Fresh channel with room for one value
                    let _ = tx.try_send(Err(CoreError::UnknownWidget(request.kind.clone())));
                }
            }
            pending.push((request.kind, rx));
        }

        group.wait().await;

        let mut outputs = Vec::with_capacity(pending.len());
        for (kind, mut rx) in pending {
            let output = match rx.recv().await {
                Some(output) => output,
                None => Err(CoreError::NoOutput(kind)),
            };
            outputs.push(output);
        }
        outputs
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use howe_core::{strip_ansi, ErrorCollector};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    struct Echo;

    #[async_trait]
    impl Widget for Echo {
        async fn handle(&self, payload: Payload, output: mpsc::Sender<WidgetOutput>, done: Done) {
            let delay = payload.get("delay").and_then(|v| v.as_u64()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let text = optional_string(&payload, "text").map(|t| t.unwrap_or_default());
            let _ = output.send(text).await;
            done.done();
        }
    }

    struct Silent;

    #[async_trait]
    impl Widget for Silent {
        async fn handle(&self, _payload: Payload, _output: mpsc::Sender<WidgetOutput>, _done: Done) {}
    }

    #[test]
    fn test_register_and_names() {
        let registry = WidgetRegistry::new();
        registry.register("echo", Arc::new(Echo));
        registry.register("banner", Arc::new(Silent));
        assert_eq!(registry.names(), vec!["banner".to_string(), "echo".to_string()]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("clock").is_none());
    }

    #[tokio::test]
    async fn test_outputs_keep_request_order() {
        let registry = WidgetRegistry::new();
        registry.register("echo", Arc::new(Echo));

        let outputs = registry
            .run(vec![
                WidgetRequest::new("echo", payload(json!({"text": "slow", "delay": 40}))),
                WidgetRequest::new("echo", payload(json!({"text": "fast"}))),
            ])
            .await;

        let texts: Vec<String> = outputs.into_iter().map(|o| o.unwrap()).collect();
        assert_eq!(texts, vec!["slow".to_string(), "fast".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_widget() {
        let registry = WidgetRegistry::new();
        let outputs = registry
            .run(vec![WidgetRequest::new("clock", Payload::new())])
            .await;
        assert_eq!(outputs.len(), 1);
        assert!(matches!(&outputs[0], Err(CoreError::UnknownWidget(name)) if name == "clock"));
    }

    #[tokio::test]
    async fn test_widget_without_output() {
        let registry = WidgetRegistry::new();
        registry.register("silent", Arc::new(Silent));
        let outputs = registry
            .run(vec![WidgetRequest::new("silent", Payload::new())])
            .await;
        assert!(matches!(&outputs[0], Err(CoreError::NoOutput(name)) if name == "silent"));
    }

    #[tokio::test]
    async fn test_banner_requests_run_independently() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Arc::new(ErrorCollector::new());
        let registry = WidgetRegistry::new();
        registry.register(
            banner::NAME,
            Arc::new(Banner::new(dir.path(), collector.clone())),
        );

        let outputs = registry
            .run(vec![
                WidgetRequest::new("banner", payload(json!({"text": "a", "color": "PURPLE"}))),
                WidgetRequest::new("banner", payload(json!({"text": "b", "font": "missing"}))),
                WidgetRequest::new("banner", payload(json!({"text": "c", "color": "rainbow"}))),
            ])
            .await;

        assert_eq!(outputs.len(), 3);
        assert!(matches!(outputs[0], Err(CoreError::InvalidColor { .. })));
        assert!(outputs[1].as_ref().unwrap().starts_with("\x1b[35m"));
        let rainbow = outputs[2].as_ref().unwrap();
        assert!(!strip_ansi(rainbow).is_empty());
        assert_eq!(collector.len(), 1);
    }
}
