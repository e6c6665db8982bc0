//! Translation of raw change notifications into reconcile requests
//!
//! Two stages run in a fixed order for every observed object:
//!
//! 1. **Declarative routes** (label patterns). Evaluated in priority order;
//!    the first route that recognises its label combination decides. A
//!    recognised combination with an unknown type value ends this stage
//!    without a request.
//! 2. **Fallback**. Only reached when no declarative route produced a
//!    target: the registry is consulted by the object's identity, and its
//!    watchers are unioned with the targets of the fallback routes (the
//!    ownership route lives here, since trust material is usually owned by
//!    the cluster it belongs to while other clusters watch it dynamically).

mod labels;
mod owner;


pub use labels::*;
pub use owner::*;

//---
use std::collections::BTreeSet;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use tracing::trace;

use crate::ChangeEvent;
use crate::ClusterObject;
use crate::ObjectIdentity;
use crate::ObservedObject;
use crate::ReconcileRequest;
use crate::RoutingConfig;
use crate::WatchRegistry;

/// Outcome of evaluating one route against an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The route does not recognise the object; try the next one
    NotApplicable,
    /// The route recognises the object but it belongs to no known category
    Ignored,
    /// The object addresses this owner
    Target(ObjectIdentity),
}

/// Stateless mapping from an observed object to the owner it addresses.
#[cfg_attr(test, automock)]
pub trait Route: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    fn route(
        &self,
        object: &ObservedObject,
    ) -> RouteDecision;
}

pub struct EventTranslator {
    routes: Vec<Arc<dyn Route>>,
    fallback_routes: Vec<Arc<dyn Route>>,
    registry: Arc<WatchRegistry>,
}

impl std::fmt::Debug for EventTranslator {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let routes: Vec<_> = self.routes.iter().map(|r| r.name()).collect();
        let fallback: Vec<_> = self.fallback_routes.iter().map(|r| r.name()).collect();
        f.debug_struct("EventTranslator")
            .field("routes", &routes)
            .field("fallback_routes", &fallback)
            .finish_non_exhaustive()
    }
}

impl EventTranslator {
    /// Translator with no routes: every object goes straight to the registry.
    pub fn new(registry: Arc<WatchRegistry>) -> Self {
        Self {
            routes: Vec::new(),
            fallback_routes: Vec::new(),
            registry,
        }
    }

    /// Remote CA route, then remote API keys route; ownership route in the
    /// fallback stage when enabled.
    pub fn from_config(
        config: &RoutingConfig,
        registry: Arc<WatchRegistry>,
    ) -> Self {
        let mut translator = Self::new(registry)
            .with_route(Arc::new(LabelRoute::remote_ca(config)))
            .with_route(Arc::new(LabelRoute::remote_api_keys(config)));

        if config.owner_route_enabled {
            let descriptor = ControllerOwnerDescriptor::new(config.owner_kind.clone());
            translator = translator.with_fallback_route(Arc::new(OwnerRoute::new(descriptor)));
        }
        translator
    }

    /// Append a declarative route (lowest priority so far).
    pub fn with_route(
        mut self,
        route: Arc<dyn Route>,
    ) -> Self {
        self.routes.push(route);
        self
    }

    /// Append a route evaluated alongside the registry lookup.
    pub fn with_fallback_route(
        mut self,
        route: Arc<dyn Route>,
    ) -> Self {
        self.fallback_routes.push(route);
        self
    }

    pub fn registry(&self) -> &Arc<WatchRegistry> {
        &self.registry
    }

    /// Requests triggered by a change of `object`, one per distinct owner.
    pub fn translate(
        &self,
        object: &ObservedObject,
    ) -> Vec<ReconcileRequest> {
        for route in &self.routes {
            match route.route(object) {
                RouteDecision::NotApplicable => continue,
                RouteDecision::Ignored => {
                    trace!(object = %object.identity, route = route.name(), "Unrecognised category");
                    break;
                }
                RouteDecision::Target(owner) => {
                    trace!(object = %object.identity, route = route.name(), owner = %owner, "Label route matched");
                    return vec![ReconcileRequest::new(owner)];
                }
            }
        }

        let mut owners = self.registry.watchers_of(&object.identity);
        for route in &self.fallback_routes {
            if let RouteDecision::Target(owner) = route.route(object) {
                owners.insert(owner);
            }
        }

        trace!(object = %object.identity, owners = owners.len(), "Fallback routing");
        owners.into_iter().map(ReconcileRequest::from).collect()
    }

    /// Requests for every object version carried by `event`, deduplicated.
    pub fn translate_event(
        &self,
        event: &ChangeEvent<ObservedObject>,
    ) -> Vec<ReconcileRequest> {
        let requests: BTreeSet<_> = event
            .objects()
            .into_iter()
            .flat_map(|object| self.translate(object))
            .collect();
        requests.into_iter().collect()
    }
}

/// Requests triggered by a change of a cluster object: the cluster itself,
/// plus every remote cluster it declares (API keys on the remote side must
/// follow the local declaration).
pub fn cluster_requests(event: &ChangeEvent<ClusterObject>) -> Vec<ReconcileRequest> {
    let requests: BTreeSet<_> = event
        .objects()
        .into_iter()
        .flat_map(|cluster| std::iter::once(cluster.identity.clone()).chain(cluster.remote_identities()))
        .map(ReconcileRequest::from)
        .collect();
    requests.into_iter().collect()
}
