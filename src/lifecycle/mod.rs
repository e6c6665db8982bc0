//! Keeps dynamic watches in line with the relationships an owner declares.
//!
//! Watch names are a pure function of the (local, remote) pair, so callers
//! never track what they registered: every pass recomputes the names,
//! upserts the declared ones and removes the rest.


use std::collections::BTreeSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::Error;
use crate::ObjectIdentity;
use crate::Result;
use crate::WatchConfig;
use crate::WatchEntry;
use crate::WatchName;
use crate::WatchRegistry;

/// Outcome of [`WatchLifecycle::sync_watches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Names that were not registered before this pass
    pub added: Vec<WatchName>,
    /// Names registered before this pass and no longer declared
    pub removed: Vec<WatchName>,
    /// Number of declared relationships, each upserted
    pub declared: usize,
}

#[derive(Debug, Clone)]
pub struct WatchLifecycle {
    registry: Arc<WatchRegistry>,
    config: WatchConfig,
}

impl WatchLifecycle {
    pub fn new(
        registry: Arc<WatchRegistry>,
        config: WatchConfig,
    ) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<WatchRegistry> {
        &self.registry
    }

    /// Deterministic name of the watch for a (local, remote) relationship.
    pub fn watch_name(
        local: &ObjectIdentity,
        remote: &ObjectIdentity,
    ) -> WatchName {
        WatchName::new(local.clone(), remote.clone())
    }

    /// Entry for a relationship: `local` watches the remote cluster's public
    /// trust material.
    pub fn watch_entry(
        &self,
        local: &ObjectIdentity,
        remote: &ObjectIdentity,
    ) -> WatchEntry {
        WatchEntry::new(
            Self::watch_name(local, remote),
            [self.config.public_certs_secret(remote)],
            local.clone(),
        )
    }

    /// Upsert the watch for (local, remote). Safe to call on every pass.
    pub fn ensure_watch(
        &self,
        ctx: &CancellationToken,
        local: &ObjectIdentity,
        remote: &ObjectIdentity,
    ) -> Result<WatchName> {
        check_cancelled(ctx, local)?;

        let entry = self.watch_entry(local, remote);
        let name = entry.name().clone();
        self.registry.add(entry);
        Ok(name)
    }

    /// Drop the watch for (local, remote). Returns whether it was present.
    pub fn remove_watch(
        &self,
        ctx: &CancellationToken,
        local: &ObjectIdentity,
        remote: &ObjectIdentity,
    ) -> Result<bool> {
        check_cancelled(ctx, local)?;

        Ok(self.registry.remove(&Self::watch_name(local, remote)))
    }

    /// Ensure one watch per declared remote and remove the watches `local`
    /// registered for remotes it no longer declares.
    pub fn sync_watches(
        &self,
        ctx: &CancellationToken,
        local: &ObjectIdentity,
        declared: impl IntoIterator<Item = ObjectIdentity>,
    ) -> Result<SyncSummary> {
        check_cancelled(ctx, local)?;

        let before = self.registry.names_watched_by(local);
        let declared: BTreeSet<WatchName> = declared
            .into_iter()
            .map(|remote| {
                let entry = self.watch_entry(local, &remote);
                let name = entry.name().clone();
                self.registry.add(entry);
                name
            })
            .collect();

        let mut summary = SyncSummary {
            added: declared.difference(&before).cloned().collect(),
            removed: Vec::new(),
            declared: declared.len(),
        };
        for stale in before.difference(&declared) {
            if self.registry.remove(stale) {
                summary.removed.push(stale.clone());
            }
        }

        debug!(
            owner = %local,
            declared = summary.declared,
            added = summary.added.len(),
            removed = summary.removed.len(),
            "Watches synchronised"
        );
        Ok(summary)
    }

    /// Remove every watch registered on behalf of `local`.
    pub fn teardown(
        &self,
        ctx: &CancellationToken,
        local: &ObjectIdentity,
    ) -> Result<Vec<WatchName>> {
        check_cancelled(ctx, local)?;

        let removed: Vec<_> = self
            .registry
            .names_watched_by(local)
            .into_iter()
            .filter(|name| self.registry.remove(name))
            .collect();

        debug!(owner = %local, removed = removed.len(), "Watches torn down");
        Ok(removed)
    }
}

fn check_cancelled(
    ctx: &CancellationToken,
    owner: &ObjectIdentity,
) -> Result<()> {
    if ctx.is_cancelled() {
        debug!(owner = %owner, "Reconciliation cancelled, registry left untouched");
        return Err(Error::Cancelled { owner: owner.clone() });
    }
    Ok(())
}
