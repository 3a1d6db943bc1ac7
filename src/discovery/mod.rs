//! Device Discovery
//!
//! Two producers of the same [`AllocatableDevices`] shape:
//!
//! - [`mirror()`] republishes devices listed from a [`DeviceGroupSource`]
//! - [`synthesize()`] fabricates a deterministic inventory from a seed
//!
//! [`DeviceEnumerator`] picks one of them according to an [`EnumerationMode`].

pub mod identity;
pub mod mirror;
pub mod synthesizer;

#[cfg(test)]
mod proptest;

pub use identity::{derive, seed_hash, IdentityStream};
pub use mirror::mirror;
pub use synthesizer::{synthesize, SyntheticDeviceProfile, Synthesizer};

use std::sync::Arc;

use tracing::info;

use crate::device::AllocatableDevices;
use crate::domain::ports::DeviceGroupSource;
use crate::error::{Error, Result};

// =============================================================================
// Enumeration Mode
// =============================================================================

/// Which producer an enumeration call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationMode {
    /// Fabricate `count` synthetic devices from the node seed
    Synthetic { count: i64 },
    /// Republish devices already published in the cluster
    Mirror,
}

impl std::fmt::Display for EnumerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumerationMode::Synthetic { count } => write!(f, "synthetic({})", count),
            EnumerationMode::Mirror => write!(f, "mirror"),
        }
    }
}

// =============================================================================
// Enumerator
// =============================================================================

/// One-shot device enumeration over either producer.
///
/// Synthetic mode needs only the seed. Mirror mode needs a source attached
/// with [`DeviceEnumerator::with_source`].
pub struct DeviceEnumerator {
    mode: EnumerationMode,
    seed: String,
    synthesizer: Synthesizer,
    source: Option<Arc<dyn DeviceGroupSource>>,
}

impl DeviceEnumerator {
    pub fn new(mode: EnumerationMode, seed: impl Into<String>) -> Self {
        Self {
            mode,
            seed: seed.into(),
            synthesizer: Synthesizer::new(),
            source: None,
        }
    }

    /// Attach the device group source mirror mode lists from.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: DeviceGroupSource + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Replace the synthesizer, e.g. to use a custom device profile.
    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn mode(&self) -> EnumerationMode {
        self.mode
    }

    /// Produce a fresh device set.
    ///
    /// Mirror mode without an attached source fails with `InvalidArgument`.
    pub async fn enumerate(&self) -> Result<AllocatableDevices> {
        let devices = match self.mode {
            EnumerationMode::Synthetic { count } => self.synthesizer.synthesize(&self.seed, count)?,
            EnumerationMode::Mirror => {
                let source = self.source.as_deref().ok_or_else(|| {
                    Error::invalid_argument("mirror mode requires a device group source")
                })?;
                mirror(source).await?
            }
        };

        info!(mode = %self.mode, devices = devices.len(), "Enumerated allocatable devices");
        Ok(devices)
    }
}

impl std::fmt::Debug for DeviceEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceEnumerator")
            .field("mode", &self.mode)
            .field("seed", &self.seed)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}
