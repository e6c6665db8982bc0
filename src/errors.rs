//! Error hierarchy for the watch layer.
//!
//! Registry operations and event translation never fail. Only the
//! surrounding plumbing can: establishing change subscriptions, loading
//! settings, or a reconciliation pass whose context was cancelled before it
//! reached the registry.

use config::ConfigError;

use crate::ObjectIdentity;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The low-level change subscription failed
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// Reconciliation context was cancelled before the registry was touched
    #[error("Reconciliation of {owner} cancelled before registry mutation")]
    Cancelled { owner: ObjectIdentity },

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Whether the host scheduler should requeue the failed reconciliation
    /// with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Subscription(_) | Error::Cancelled { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// The host client could not establish the subscription
    #[error("Failed to subscribe to {kind} changes: {source}")]
    Unavailable {
        kind: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The change stream ended while the controller was running
    #[error("Change stream for {kind} closed")]
    StreamClosed { kind: &'static str },
}
