//! User-facing feedback channel.
//!
//! The core reports every user-visible success or failure through a
//! [`Notifier`] and never depends on what the host does with it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
    Money,
}

/// Fire-and-forget toast sink supplied by the host.
pub trait Notifier {
    fn show_toast(&mut self, message: &str, severity: Severity);
}

impl<F> Notifier for F
where
    F: FnMut(&str, Severity),
{
    fn show_toast(&mut self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// Discards every toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn show_toast(&mut self, _message: &str, _severity: Severity) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

/// Records toasts in order. Handy for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    pub entries: Vec<Toast>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.entries.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|t| t.severity == severity).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Notifier for ToastLog {
    fn show_toast(&mut self, message: &str, severity: Severity) {
        self.entries.push(Toast {
            message: message.to_string(),
            severity,
        });
    }
}
