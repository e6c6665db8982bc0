#[cfg(test)]
use mockall::automock;

use super::Route;
use super::RouteDecision;
use crate::ObjectIdentity;
use crate::ObservedObject;

/// Capability answering "which resource owns this object", the ownership
/// counterpart of reading a label map.
#[cfg_attr(test, automock)]
pub trait OwnerDescriptor: Send + Sync {
    fn owner_of(
        &self,
        object: &ObservedObject,
    ) -> Option<ObjectIdentity>;
}

/// Follows the controlling owner reference of a given kind.
#[derive(Debug, Clone)]
pub struct ControllerOwnerDescriptor {
    kind: String,
}

impl ControllerOwnerDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl OwnerDescriptor for ControllerOwnerDescriptor {
    fn owner_of(
        &self,
        object: &ObservedObject,
    ) -> Option<ObjectIdentity> {
        object
            .owner_references
            .iter()
            .find(|owner| owner.controller && owner.kind == self.kind)
            .map(|owner| object.identity.sibling(owner.name.clone()))
    }
}

/// Route backed by an [`OwnerDescriptor`].
#[derive(Debug)]
pub struct OwnerRoute<D> {
    descriptor: D,
}

impl<D: OwnerDescriptor> OwnerRoute<D> {
    pub fn new(descriptor: D) -> Self {
        Self { descriptor }
    }
}

impl<D: OwnerDescriptor> Route for OwnerRoute<D> {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn route(
        &self,
        object: &ObservedObject,
    ) -> RouteDecision {
        match self.descriptor.owner_of(object) {
            Some(owner) => RouteDecision::Target(owner),
            None => RouteDecision::NotApplicable,
        }
    }
}
