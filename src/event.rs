//! Objects and change notifications delivered by the host subscription.

use std::collections::BTreeMap;

use crate::ObjectIdentity;

/// Pointer from an object to one of its owners, as set by the host platform.
///
/// Owners live in the same namespace as the owned object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
    /// Set when the owner is the managing controller of the object
    pub controller: bool,
}

/// Snapshot of a watched object (a secret holding trust material) as
/// reported by a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedObject {
    pub identity: ObjectIdentity,
    pub labels: BTreeMap<String, String>,
    pub owner_references: Vec<OwnerReference>,
}

impl ObservedObject {
    pub fn new(identity: ObjectIdentity) -> Self {
        Self {
            identity,
            labels: BTreeMap::new(),
            owner_references: Vec::new(),
        }
    }

    pub fn with_label(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_owner(
        mut self,
        owner: OwnerReference,
    ) -> Self {
        self.owner_references.push(owner);
        self
    }

    pub fn label(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Reference from a cluster to a remote cluster it trusts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteClusterRef {
    pub name: String,
    /// Defaults to the referencing cluster's namespace when unset
    pub namespace: Option<String>,
}

impl RemoteClusterRef {
    pub fn resolve(
        &self,
        default_namespace: &str,
    ) -> ObjectIdentity {
        let namespace = self.namespace.as_deref().unwrap_or(default_namespace);
        ObjectIdentity::new(namespace, self.name.clone())
    }
}

/// Cluster resource that declares relationships to remote clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterObject {
    pub identity: ObjectIdentity,
    pub remote_clusters: Vec<RemoteClusterRef>,
}

impl ClusterObject {
    /// Identities of all declared remote clusters, namespaces resolved.
    pub fn remote_identities(&self) -> impl Iterator<Item = ObjectIdentity> + '_ {
        self.remote_clusters
            .iter()
            .map(|r| r.resolve(&self.identity.namespace))
    }
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<T> {
    /// Object was created, or first seen after a (re)subscription
    Applied(T),
    /// Object was modified; both versions are delivered
    Updated { old: T, new: T },
    /// Object was removed
    Deleted(T),
}

impl<T> ChangeEvent<T> {
    /// Every object version carried by the event. Updates yield old then new.
    pub fn objects(&self) -> Vec<&T> {
        match self {
            ChangeEvent::Applied(obj) | ChangeEvent::Deleted(obj) => vec![obj],
            ChangeEvent::Updated { old, new } => vec![old, new],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Applied(_) => "applied",
            ChangeEvent::Updated { .. } => "updated",
            ChangeEvent::Deleted(_) => "deleted",
        }
    }
}
