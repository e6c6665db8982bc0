use std::collections::BTreeSet;
use std::fmt;

use crate::ObjectIdentity;

/// Name of a dynamic watch, derived from the (local, remote) relationship.
///
/// The name is a structured key rather than a joined string, so two distinct
/// relationship pairs can never collide whatever characters their
/// namespaces or names contain. The `Display` form is only used in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchName {
    pub local: ObjectIdentity,
    pub remote: ObjectIdentity,
}

impl WatchName {
    pub fn new(
        local: ObjectIdentity,
        remote: ObjectIdentity,
    ) -> Self {
        Self { local, remote }
    }
}

impl fmt::Display for WatchName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}->{}", self.local, self.remote)
    }
}

/// One logical watch: which objects are observed, and who to notify.
///
/// Entries are immutable once added; re-adding a same-named entry replaces
/// it as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    name: WatchName,
    watched: BTreeSet<ObjectIdentity>,
    watcher: ObjectIdentity,
}

impl WatchEntry {
    pub fn new(
        name: WatchName,
        watched: impl IntoIterator<Item = ObjectIdentity>,
        watcher: ObjectIdentity,
    ) -> Self {
        Self {
            name,
            watched: watched.into_iter().collect(),
            watcher,
        }
    }

    pub fn name(&self) -> &WatchName {
        &self.name
    }

    pub fn watched(&self) -> &BTreeSet<ObjectIdentity> {
        &self.watched
    }

    pub fn watcher(&self) -> &ObjectIdentity {
        &self.watcher
    }

    /// Number of registry keys this entry is filed under
    pub fn fan_out(&self) -> usize {
        self.watched.len()
    }
}
