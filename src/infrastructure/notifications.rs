//! Notifier adapter writing user notifications to the log

use crate::application::ports::outbound::NotifierPort;

/// Sends warnings and debug messages to tracing under the `notifications` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotifierPort for TracingNotifier {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "notifications", "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "notifications", "{}", message);
    }
}
