use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::ObjectIdentity;
use crate::Result;

/// Naming of the trust-material objects a relationship watches.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Suffix appended to a cluster name to form the name of the secret
    /// holding its public transport certificates
    ///
    /// **Default**: `-es-transport-certs-public`
    #[serde(default = "default_public_certs_suffix")]
    pub public_certs_suffix: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            public_certs_suffix: default_public_certs_suffix(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.public_certs_suffix.is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "watch.public_certs_suffix must not be empty".into(),
            )));
        }
        Ok(())
    }

    /// Identity of the secret holding `cluster`'s public trust material.
    pub fn public_certs_secret(
        &self,
        cluster: &ObjectIdentity,
    ) -> ObjectIdentity {
        cluster.sibling(format!("{}{}", cluster.name, self.public_certs_suffix))
    }
}

fn default_public_certs_suffix() -> String {
    "-es-transport-certs-public".into()
}
