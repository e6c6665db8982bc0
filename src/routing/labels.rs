use super::Route;
use super::RouteDecision;
use crate::ObjectIdentity;
use crate::ObservedObject;
use crate::RoutingConfig;

/// Where a matched label route addresses its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTarget {
    /// Namespace and name both come from labels
    Labelled {
        namespace_label: String,
        name_label: String,
    },
    /// Name comes from a label, namespace is the object's own
    SameNamespace { name_label: String },
}

/// Route keyed on a label combination plus a type discriminator value.
///
/// The route applies when every label of its combination is present. It
/// then targets the encoded owner if the type label carries the expected
/// value, and ignores the object otherwise.
#[derive(Debug, Clone)]
pub struct LabelRoute {
    name: &'static str,
    type_label: String,
    type_value: String,
    target: LabelTarget,
}

impl LabelRoute {
    pub fn new(
        name: &'static str,
        type_label: impl Into<String>,
        type_value: impl Into<String>,
        target: LabelTarget,
    ) -> Self {
        Self {
            name,
            type_label: type_label.into(),
            type_value: type_value.into(),
            target,
        }
    }

    /// `{relationship-name, relationship-namespace, type=remote-ca}`
    pub fn remote_ca(config: &RoutingConfig) -> Self {
        Self::new(
            "remote-ca",
            config.type_label.clone(),
            config.remote_ca_type.clone(),
            LabelTarget::Labelled {
                namespace_label: config.relationship_namespace_label.clone(),
                name_label: config.relationship_name_label.clone(),
            },
        )
    }

    /// `{cluster-name, type=remote-api-keys}` in the object's own namespace
    pub fn remote_api_keys(config: &RoutingConfig) -> Self {
        Self::new(
            "remote-api-keys",
            config.type_label.clone(),
            config.remote_api_keys_type.clone(),
            LabelTarget::SameNamespace {
                name_label: config.cluster_name_label.clone(),
            },
        )
    }

    fn resolve(
        &self,
        object: &ObservedObject,
    ) -> Option<ObjectIdentity> {
        match &self.target {
            LabelTarget::Labelled {
                namespace_label,
                name_label,
            } => {
                let namespace = object.label(namespace_label)?;
                let name = object.label(name_label)?;
                Some(ObjectIdentity::new(namespace, name))
            }
            LabelTarget::SameNamespace { name_label } => {
                let name = object.label(name_label)?;
                Some(object.identity.sibling(name))
            }
        }
    }
}

impl Route for LabelRoute {
    fn name(&self) -> &'static str {
        self.name
    }

    fn route(
        &self,
        object: &ObservedObject,
    ) -> RouteDecision {
        let Some(kind) = object.label(&self.type_label) else {
            return RouteDecision::NotApplicable;
        };
        let Some(owner) = self.resolve(object) else {
            return RouteDecision::NotApplicable;
        };

        if kind != self.type_value {
            return RouteDecision::Ignored;
        }
        RouteDecision::Target(owner)
    }
}
