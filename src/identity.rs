use std::fmt;

/// (namespace, name) pair identifying one object instance within a cluster.
///
/// Used both as a registry key (the watched object) and as the watcher
/// reference that must be re-reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentity {
    pub namespace: String,
    pub name: String,
}

impl ObjectIdentity {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Identity of an object living in the same namespace as `self`.
    pub fn sibling(
        &self,
        name: impl Into<String>,
    ) -> Self {
        Self::new(self.namespace.clone(), name)
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Unit of work handed to the host reconciliation queue.
///
/// Carries no payload beyond the owner identity; the reconciler re-reads
/// current state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReconcileRequest {
    pub identity: ObjectIdentity,
}

impl ReconcileRequest {
    pub fn new(identity: ObjectIdentity) -> Self {
        Self { identity }
    }
}

impl From<ObjectIdentity> for ReconcileRequest {
    fn from(identity: ObjectIdentity) -> Self {
        Self { identity }
    }
}

impl fmt::Display for ReconcileRequest {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Display::fmt(&self.identity, f)
    }
}
