//! Dynamic watches multiplexed over a single low-level subscription
//!
//! One subscription on secrets feeds many logical watches, each registered
//! and removed independently as relationships come and go:
//!
//! ```text
//! ┌──────────────────┐   ensure / remove   ┌────────────────┐
//! │ WatchLifecycle   │ ──────────────────▶ │ WatchRegistry  │
//! │ (reconcilers)    │                     │ (RwLock index) │
//! └──────────────────┘                     └───────┬────────┘
//!                                                  │ lookup(changed object)
//!                                                  ▼
//!                                          ┌────────────────┐
//!                                          │ EventTranslator│ ─▶ ReconcileRequest
//!                                          └────────────────┘
//! ```
//!
//! The registry has no persistence. After a restart it is rebuilt as owners
//! are reconciled again, and every reconciliation pass re-establishes its
//! own watches.

mod entry;
mod registry;


pub use entry::*;
pub use registry::*;
