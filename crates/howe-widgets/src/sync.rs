//! Completion tracking for concurrently running widgets

use tokio::sync::mpsc;

/// Waits until every handed-out [`Done`] token has been released
#[derive(Debug)]
pub struct WaitGroup {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

/// Completion token for one widget invocation.
///
/// Releasing it, explicitly or by dropping, signals the group exactly once.
#[derive(Debug)]
pub struct Done {
    _tx: mpsc::Sender<()>,
}

impl WaitGroup {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { tx, rx }
    }

    /// Register one more pending invocation
    pub fn add(&self) -> Done {
        Done {
            _tx: self.tx.clone(),
        }
    }

    /// Resolve once all tokens are released
    pub async fn wait(self) {
        let Self { tx, mut rx } = self;
        drop(tx);
        // Nothing is ever sent; recv yields None when the last token goes away
        while rx.recv().await.is_some() {}
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Done {
    /// Mark the invocation as finished
    pub fn done(self) {}
}
