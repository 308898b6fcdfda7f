//! Non-fatal error reporting
//!
//! Widgets use this side channel for problems they recovered from. The
//! request keeps going; the host decides when and how to show the notes.

use parking_lot::Mutex;

/// Sink for non-fatal notifications
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: String);
}

/// Reporter that logs each notification and keeps it for later display
#[derive(Debug, Default)]
pub struct ErrorCollector {
    messages: Mutex<Vec<String>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Remove and return all collected notifications
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl ErrorReporter for ErrorCollector {
    fn report(&self, message: String) {
        tracing::warn!("{}", message);
        self.messages.lock().push(message);
    }
}
