// # Notifier Trait
//
// Defines the interface for raising a user-visible notification when a
// monitored domain changes state.
//
// ## Implementations
//
// - Desktop (notify-rust): `rdapwatch-notify-desktop` crate

use async_trait::async_trait;

/// Trait for notifier implementations
///
/// A notifier only delivers a message it is given. Deciding whether a
/// change deserves a notification, and what it says, is owned by the
/// engine. Errors are returned to the engine, which reports them and keeps
/// going.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Raise a notification about `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the notification was handed to the sink
    /// - `Err(Error)`: the sink refused or was unreachable
    async fn notify(&self, domain: &str, message: &str) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
