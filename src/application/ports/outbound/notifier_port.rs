//! Notifier port - User-facing notification channel

/// Fire-and-forget messages for whoever is driving the engine
pub trait NotifierPort: Send + Sync {
    /// Something the user should see, such as a refused edit
    fn warn(&self, message: &str);

    /// Diagnostic detail, not shown to users
    fn debug(&self, message: &str);
}
