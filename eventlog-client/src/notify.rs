//! User-facing notifications (the toast/snackbar of a UI, a coloured line in a terminal).

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Notification {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notification {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Sink the controllers report outcomes to.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => info!(text = %notification.text, "notification"),
            Severity::Error => warn!(text = %notification.text, "notification"),
        }
    }
}
