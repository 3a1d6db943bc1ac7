//! Inventory Configuration
//!
//! Settings for one enumeration run, loaded from the environment or a YAML
//! file. The binary layers its CLI flags on top.

use serde::Deserialize;

use crate::discovery::EnumerationMode;
use crate::error::{Error, Result};

/// Environment variable carrying the node seed
pub const NODE_NAME_ENV: &str = "NODE_NAME";

/// Environment variable carrying the synthetic device count
pub const NUM_DEVICES_ENV: &str = "NUM_DEVICES";

/// Default number of synthetic devices
pub const DEFAULT_NUM_DEVICES: i64 = 8;

/// Where devices come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventorySource {
    /// Fabricate a deterministic inventory
    #[default]
    Synthetic,
    /// Mirror published ResourceSlices
    Mirror,
}

/// Configuration for a device enumeration run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryConfig {
    /// Which producer to use
    pub source: InventorySource,

    /// Number of synthetic devices
    pub num_devices: i64,

    /// Seed for synthetic identities (the node name)
    pub node_name: String,

    /// Restrict mirroring to slices published by this driver
    pub driver: Option<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            source: InventorySource::Synthetic,
            num_devices: DEFAULT_NUM_DEVICES,
            node_name: String::new(),
            driver: None,
        }
    }
}

impl InventoryConfig {
    /// Read `NODE_NAME` and `NUM_DEVICES` from the process environment.
    ///
    /// A missing `NODE_NAME` yields an empty seed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            node_name: lookup(NODE_NAME_ENV).unwrap_or_default(),
            ..Self::default()
        };

        if let Some(raw) = lookup(NUM_DEVICES_ENV) {
            config.num_devices = raw.trim().parse().map_err(|e| {
                Error::invalid_argument(format!("{}='{}' is not an integer: {}", NUM_DEVICES_ENV, raw, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check preconditions that would otherwise fail later in enumeration.
    pub fn validate(&self) -> Result<()> {
        if self.source == InventorySource::Synthetic && self.num_devices < 0 {
            return Err(Error::invalid_argument(format!(
                "numDevices must not be negative, got {}",
                self.num_devices
            )));
        }
        Ok(())
    }

    /// The enumeration mode this configuration selects
    pub fn mode(&self) -> EnumerationMode {
        match self.source {
            InventorySource::Synthetic => EnumerationMode::Synthetic {
                count: self.num_devices,
            },
            InventorySource::Mirror => EnumerationMode::Mirror,
        }
    }
}
