//! In-memory index of dynamic watches.
//!
//! ```text
//!   add(entry) ──────────┐
//!   remove(name) ────────┤  single RwLock critical section
//!   lookup(watched) ─────┤
//!                        ▼
//!   entries:    WatchName       -> WatchEntry       (reverse index: entry -> its keys)
//!   by_watched: ObjectIdentity  -> {WatchName}      (one slot per watched key)
//!   by_watcher: ObjectIdentity  -> {WatchName}      (what an owner registered)
//! ```
//!
//! An entry watching k objects is filed under k keys. Because the entry
//! itself records its keys, removal touches exactly those k slots and never
//! scans the registry. Every mutation happens under one write lock, so
//! readers never observe an entry filed under only part of its keys.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use super::WatchEntry;
use super::WatchName;
use crate::ObjectIdentity;
use crate::ReconcileRequest;

#[derive(Debug, Default)]
struct RegistryIndex {
    entries: HashMap<WatchName, Arc<WatchEntry>>,
    by_watched: HashMap<ObjectIdentity, BTreeSet<WatchName>>,
    by_watcher: HashMap<ObjectIdentity, BTreeSet<WatchName>>,
}

impl RegistryIndex {
    fn insert(
        &mut self,
        entry: Arc<WatchEntry>,
    ) -> Option<Arc<WatchEntry>> {
        let name = entry.name().clone();
        let previous = self.unlink(&name);

        for key in entry.watched() {
            self.by_watched
                .entry(key.clone())
                .or_default()
                .insert(name.clone());
        }
        self.by_watcher
            .entry(entry.watcher().clone())
            .or_default()
            .insert(name.clone());
        self.entries.insert(name, entry);

        previous
    }

    fn unlink(
        &mut self,
        name: &WatchName,
    ) -> Option<Arc<WatchEntry>> {
        let entry = self.entries.remove(name)?;
        for key in entry.watched() {
            detach(&mut self.by_watched, key, name);
        }
        detach(&mut self.by_watcher, entry.watcher(), name);
        Some(entry)
    }

    fn entries_under(
        &self,
        watched: &ObjectIdentity,
    ) -> impl Iterator<Item = &Arc<WatchEntry>> {
        self.by_watched
            .get(watched)
            .into_iter()
            .flatten()
            .filter_map(|name| self.entries.get(name))
    }
}

fn detach(
    index: &mut HashMap<ObjectIdentity, BTreeSet<WatchName>>,
    key: &ObjectIdentity,
    name: &WatchName,
) {
    if let Some(names) = index.get_mut(key) {
        names.remove(name);
        if names.is_empty() {
            index.remove(key);
        }
    }
}

/// Process-wide registry of dynamic watches.
///
/// Shared between reconciliation workers (which add and remove entries) and
/// the event delivery path (which looks them up). Wrap in an `Arc` and pass
/// it explicitly to both.
///
/// No operation performs I/O or can fail. Lock hold time is bounded by the
/// fan-out of the single entry being added or removed, or by the number of
/// entries under the looked-up key.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    index: RwLock<RegistryIndex>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` under every one of its watched identities, replacing
    /// any entry with the same name.
    pub fn add(
        &self,
        entry: WatchEntry,
    ) {
        let name = entry.name().clone();
        let fan_out = entry.fan_out();

        let previous = self.index.write().insert(Arc::new(entry));

        match previous {
            Some(_) => trace!(watch = %name, fan_out, "Watch replaced"),
            None => debug!(watch = %name, fan_out, "Watch added"),
        }
    }

    /// Remove the named entry from every key it is filed under.
    ///
    /// Returns whether an entry was removed. Removing an absent name is a
    /// no-op.
    pub fn remove(
        &self,
        name: &WatchName,
    ) -> bool {
        let removed = self.index.write().unlink(name);

        match removed {
            Some(entry) => {
                debug!(watch = %name, fan_out = entry.fan_out(), "Watch removed");
                true
            }
            None => {
                trace!(watch = %name, "Watch already absent");
                false
            }
        }
    }

    /// Snapshot of the entries currently filed under `watched`, ordered by
    /// name.
    pub fn lookup(
        &self,
        watched: &ObjectIdentity,
    ) -> Vec<Arc<WatchEntry>> {
        self.index.read().entries_under(watched).cloned().collect()
    }

    /// Distinct watchers interested in `watched`.
    pub fn watchers_of(
        &self,
        watched: &ObjectIdentity,
    ) -> BTreeSet<ObjectIdentity> {
        self.index
            .read()
            .entries_under(watched)
            .map(|entry| entry.watcher().clone())
            .collect()
    }

    /// One reconcile request per distinct watcher of `watched`.
    pub fn requests_for(
        &self,
        watched: &ObjectIdentity,
    ) -> Vec<ReconcileRequest> {
        self.watchers_of(watched)
            .into_iter()
            .map(ReconcileRequest::from)
            .collect()
    }

    /// Names of every entry registered on behalf of `watcher`.
    pub fn names_watched_by(
        &self,
        watcher: &ObjectIdentity,
    ) -> BTreeSet<WatchName> {
        self.index
            .read()
            .by_watcher
            .get(watcher)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get(
        &self,
        name: &WatchName,
    ) -> Option<Arc<WatchEntry>> {
        self.index.read().entries.get(name).cloned()
    }

    pub fn contains(
        &self,
        name: &WatchName,
    ) -> bool {
        self.index.read().entries.contains_key(name)
    }

    /// Sorted snapshot of all registered names
    pub fn names(&self) -> Vec<WatchName> {
        let mut names: Vec<_> = self.index.read().entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.index.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().entries.is_empty()
    }

    /// Number of distinct watched identities with at least one entry
    pub fn watched_key_count(&self) -> usize {
        self.index.read().by_watched.len()
    }
}
