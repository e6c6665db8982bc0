//! Configuration management for the watch layer.
//!
//! Provides hierarchical configuration loading from multiple sources with priority:
//! 1. Default values (hardcoded)
//! 2. Config file supplied by the caller
//! 3. Config file named by `TRUST_WATCH_CONFIG_PATH`
//! 4. Environment variables (highest priority)

mod routing;
mod watch;
pub use routing::*;
pub use watch::*;

#[cfg(test)]
mod config_test;

//---
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Environment variable naming an additional config file
pub const CONFIG_PATH_ENV: &str = "TRUST_WATCH_CONFIG_PATH";

/// Prefix of environment overrides, e.g. `TRUST_WATCH__ROUTING__TYPE_LABEL`
pub const ENV_PREFIX: &str = "TRUST_WATCH";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    /// Label vocabulary used for stateless routing
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Naming of the objects registered as dynamic watches
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Settings {
    /// Load configuration from multiple sources with priority:
    /// 1. Defaults
    /// 2. `config_path`, if given (must exist)
    /// 3. File named by `TRUST_WATCH_CONFIG_PATH` (must exist when set)
    /// 4. Environment variables
    ///
    /// The merged result is validated before being returned.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        if let Some(path) = config_path {
            config = config.add_source(File::with_name(path).required(true));
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            config = config.add_source(File::with_name(&path).required(true));
        }

        config = config.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.routing.validate()?;
        self.watch.validate()?;
        Ok(())
    }
}
