//! Navigation and blocking notification seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session-expiry handler tells the user and then forces a full,
//! state-discarding navigation to the login entry point. Hosts supply the
//! real implementations; the recording ones back tests and headless use.

use std::sync::{Mutex, PoisonError};

pub trait Navigator: Send + Sync {
    /// Leave the current view entirely and load `target` from scratch.
    fn navigate_full(&self, target: &str);
}

pub trait Notifier: Send + Sync {
    /// Show `message` and return only once the user has seen it.
    fn notify_blocking(&self, message: &str);
}

/// Navigator for headless hosts: logs the target and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_full(&self, target: &str) {
        tracing::info!(%target, "full navigation requested");
    }
}

/// Notifier for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_blocking(&self, message: &str) {
        tracing::warn!(%message, "user notification");
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_full(&self, target: &str) {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner).push(target.to_owned());
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_blocking(&self, message: &str) {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_owned());
    }
}
