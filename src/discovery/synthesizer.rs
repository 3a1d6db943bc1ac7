//! Deterministic Synthesizer
//!
//! Fabricates a reproducible fake GPU inventory for test and demo nodes.

use tracing::debug;

use super::identity;
use crate::device::{AllocatableDevices, AttributeValue, DeviceDescriptor, Quantity};
use crate::error::{Error, Result};

/// Prefix of synthesized device names
pub const DEVICE_NAME_PREFIX: &str = "gpu-";

pub const ATTR_INDEX: &str = "index";
pub const ATTR_UUID: &str = "uuid";
pub const ATTR_MODEL: &str = "model";
pub const ATTR_DRIVER_VERSION: &str = "driverVersion";
pub const CAPACITY_MEMORY: &str = "memory";

// =============================================================================
// Profile
// =============================================================================

/// The per-device fields that are not derived from the ordinal or the seed.
///
/// Every synthesized device shares one profile. The default reproduces the
/// stock synthetic inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticDeviceProfile {
    /// Value of the `model` attribute
    pub model: String,
    /// Value of the `driverVersion` attribute
    pub driver_version: String,
    /// Value of the `memory` capacity
    pub memory: Quantity,
}

impl Default for SyntheticDeviceProfile {
    fn default() -> Self {
        Self {
            model: "LATEST-GPU-MODEL".to_string(),
            driver_version: "1.0.0".to_string(),
            memory: Quantity::gibibytes(80),
        }
    }
}

// =============================================================================
// Synthesizer
// =============================================================================

/// Builds synthetic inventories from a seed and a device count.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    profile: SyntheticDeviceProfile,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: SyntheticDeviceProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &SyntheticDeviceProfile {
        &self.profile
    }

    /// Synthesize `count` devices named `gpu-0` .. `gpu-{count-1}`.
    ///
    /// Fails with `InvalidArgument` when `count` is negative or does not fit
    /// in the platform's `usize`.
    pub fn synthesize(&self, seed: &str, count: i64) -> Result<AllocatableDevices> {
        let count = usize::try_from(count).map_err(|_| {
            if count < 0 {
                Error::invalid_argument(format!("device count must not be negative, got {}", count))
            } else {
                Error::invalid_argument(format!("device count {} exceeds platform limit", count))
            }
        })?;

        let devices: AllocatableDevices = identity::derive(seed, count)
            .into_iter()
            .enumerate()
            .map(|(i, uuid)| self.device(i, uuid))
            .collect();

        debug!(seed = %seed, count = devices.len(), "Synthesized devices");
        Ok(devices)
    }

    fn device(&self, index: usize, uuid: String) -> DeviceDescriptor {
        DeviceDescriptor::builder(format!("{}{}", DEVICE_NAME_PREFIX, index))
            .attribute(ATTR_INDEX, AttributeValue::Int(index as i64))
            .attribute(ATTR_UUID, AttributeValue::String(uuid))
            .attribute(ATTR_MODEL, AttributeValue::String(self.profile.model.clone()))
            .attribute(
                ATTR_DRIVER_VERSION,
                AttributeValue::Version(self.profile.driver_version.clone()),
            )
            .capacity(CAPACITY_MEMORY, self.profile.memory.clone())
            .build()
    }
}

/// Synthesize with the default profile.
pub fn synthesize(seed: &str, count: i64) -> Result<AllocatableDevices> {
    Synthesizer::new().synthesize(seed, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_synthesize_reference_example() {
        let devices = synthesize("node-1", 3).unwrap();
        let uuids = identity::derive("node-1", 3);

        assert_eq!(devices.len(), 3);
        assert_eq!(devices.names().collect::<Vec<_>>(), vec!["gpu-0", "gpu-1", "gpu-2"]);

        for (i, uuid) in uuids.iter().enumerate() {
            let d = devices.get(&format!("gpu-{}", i)).unwrap();
            assert_eq!(d.attribute(ATTR_INDEX), Some(&AttributeValue::Int(i as i64)));
            assert_eq!(d.attribute(ATTR_UUID), Some(&AttributeValue::String(uuid.clone())));
            assert_eq!(
                d.attribute(ATTR_MODEL),
                Some(&AttributeValue::String("LATEST-GPU-MODEL".into()))
            );
            assert_eq!(
                d.attribute(ATTR_DRIVER_VERSION),
                Some(&AttributeValue::Version("1.0.0".into()))
            );
            assert_eq!(d.capacity_of(CAPACITY_MEMORY).map(|q| q.to_string()).as_deref(), Some("80Gi"));
            assert_eq!(d.capacity().len(), 1);
        }

        assert_eq!(
            devices.get("gpu-2").unwrap().attribute(ATTR_UUID).and_then(AttributeValue::as_str),
            Some(uuids[2].as_str())
        );
    }

    #[test]
    fn test_synthesize_zero() {
        let devices = synthesize("node-1", 0).unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn test_synthesize_negative_count() {
        let err = synthesize("node-1", -1).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        assert_matches!(err, Error::InvalidArgument(msg) if msg.contains("must not be negative"));
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_synthesize_count_beyond_usize() {
        let err = synthesize("node-1", i64::from(u32::MAX) + 1).unwrap_err();
        assert_matches!(err, Error::InvalidArgument(msg) if msg.contains("exceeds platform limit"));
    }

    #[test]
    fn test_synthesize_empty_seed() {
        let devices = synthesize("", 2).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices, synthesize("", 2).unwrap());
    }

    #[test]
    fn test_synthesize_deterministic_bytes() {
        let a = serde_json::to_vec(&synthesize("node-a", 16).unwrap()).unwrap();
        let b = serde_json::to_vec(&synthesize("node-a", 16).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_profile() {
        let synth = Synthesizer::with_profile(SyntheticDeviceProfile {
            model: "A100".to_string(),
            driver_version: "535.104.05".to_string(),
            memory: Quantity::gibibytes(40),
        });
        let devices = synth.synthesize("node-1", 2).unwrap();
        let d = devices.get("gpu-1").unwrap();

        assert_eq!(d.attribute(ATTR_MODEL).and_then(AttributeValue::as_str), Some("A100"));
        assert_eq!(d.capacity_of(CAPACITY_MEMORY), Some(&Quantity::gibibytes(40)));
        // identities do not depend on the profile
        assert_eq!(
            d.attribute(ATTR_UUID),
            synthesize("node-1", 2).unwrap().get("gpu-1").unwrap().attribute(ATTR_UUID)
        );
    }
}
