//! # trust-watch
//!
//! Dynamic watch registry and event routing for a controller that manages
//! trust relationships (certificate authorities, API keys) between a local
//! cluster and the remote clusters it declares.
//!
//! A single low-level subscription on secrets is multiplexed into many
//! logical watches that are registered and removed at runtime as
//! relationships appear and disappear. Every change notification becomes the
//! set of owners that must be reconciled again.
//!
//! ## Components
//!
//! - [`WatchRegistry`] - concurrent index from watched object to watch entries
//! - [`EventTranslator`] - label routes first, registry (and owner) fallback
//! - [`WatchLifecycle`] - idempotent upsert/removal of watches per relationship
//! - [`Controller`] - wiring between host subscriptions and the reconcile queue
//!
//! ## Example
//!
//! ```ignore
//! let settings = Settings::load(None)?;
//! let registry = Arc::new(WatchRegistry::new());
//!
//! // reconciliation workers
//! let lifecycle = WatchLifecycle::new(registry.clone(), settings.watch.clone());
//! lifecycle.sync_watches(&ctx, &local, declared_remotes)?;
//!
//! // event delivery path
//! let controller = Controller::from_settings(&settings, registry, source, queue);
//! controller.run(shutdown).await?;
//! ```

mod config;
mod controller;
mod errors;
mod event;
mod identity;
mod lifecycle;
mod routing;
mod watch;


pub use config::*;
pub use controller::*;
pub use errors::*;
pub use event::*;
pub use identity::*;
pub use lifecycle::*;
pub use routing::*;
pub use watch::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
