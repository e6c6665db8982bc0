use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Label vocabulary for declarative (stateless) routing of secret events.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoutingConfig {
    /// Label naming the cluster a remote CA secret was copied for
    #[serde(default = "default_relationship_name_label")]
    pub relationship_name_label: String,

    /// Label naming the namespace of that cluster
    #[serde(default = "default_relationship_namespace_label")]
    pub relationship_namespace_label: String,

    /// Label naming the cluster an API keys secret belongs to
    /// (resolved in the secret's own namespace)
    #[serde(default = "default_cluster_name_label")]
    pub cluster_name_label: String,

    /// Type discriminator label
    #[serde(default = "default_type_label")]
    pub type_label: String,

    /// Type value of remote certificate authority secrets
    #[serde(default = "default_remote_ca_type")]
    pub remote_ca_type: String,

    /// Type value of remote API keys secrets
    #[serde(default = "default_remote_api_keys_type")]
    pub remote_api_keys_type: String,

    /// Route objects to their controlling owner
    #[serde(default = "default_owner_route_enabled")]
    pub owner_route_enabled: bool,

    /// Kind an owner reference must carry to be followed
    #[serde(default = "default_owner_kind")]
    pub owner_kind: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            relationship_name_label: default_relationship_name_label(),
            relationship_namespace_label: default_relationship_namespace_label(),
            cluster_name_label: default_cluster_name_label(),
            type_label: default_type_label(),
            remote_ca_type: default_remote_ca_type(),
            remote_api_keys_type: default_remote_api_keys_type(),
            owner_route_enabled: default_owner_route_enabled(),
            owner_kind: default_owner_kind(),
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<()> {
        let labels = [
            ("relationship_name_label", &self.relationship_name_label),
            ("relationship_namespace_label", &self.relationship_namespace_label),
            ("cluster_name_label", &self.cluster_name_label),
            ("type_label", &self.type_label),
            ("remote_ca_type", &self.remote_ca_type),
            ("remote_api_keys_type", &self.remote_api_keys_type),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                return Err(Error::Config(ConfigError::Message(format!(
                    "routing.{field} must not be empty"
                ))));
            }
        }

        if self.relationship_name_label == self.relationship_namespace_label {
            return Err(Error::Config(ConfigError::Message(
                "routing.relationship_name_label and routing.relationship_namespace_label must differ"
                    .into(),
            )));
        }

        if self.remote_ca_type == self.remote_api_keys_type {
            return Err(Error::Config(ConfigError::Message(
                "routing.remote_ca_type and routing.remote_api_keys_type must differ".into(),
            )));
        }

        if self.owner_route_enabled && self.owner_kind.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "routing.owner_kind must be set when the owner route is enabled".into(),
            )));
        }

        Ok(())
    }
}

fn default_relationship_name_label() -> String {
    "relationship-name".into()
}
fn default_relationship_namespace_label() -> String {
    "relationship-namespace".into()
}
fn default_cluster_name_label() -> String {
    "cluster-name".into()
}
fn default_type_label() -> String {
    "type".into()
}
fn default_remote_ca_type() -> String {
    "remote-ca".into()
}
fn default_remote_api_keys_type() -> String {
    "remote-api-keys".into()
}
fn default_owner_route_enabled() -> bool {
    true
}
fn default_owner_kind() -> String {
    "Elasticsearch".into()
}
