//! Domain Ports
//!
//! Trait abstractions for the external collaborators the inventory depends
//! on. Infrastructure adapters in [`crate::adapters`] implement them.
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │   Inventory Mirror (domain)  │ ─────▶ │   DeviceGroupSource (port)   │
//! └──────────────────────────────┘        └──────────────────────────────┘
//!                                                        │
//!                                   ┌────────────────────┴─────────────────┐
//!                                   ▼                                      ▼
//!                     ResourceSliceSource (kube)        InMemoryDeviceGroupSource
//! ```

use async_trait::async_trait;

use crate::device::DeviceDescriptor;
use crate::error::Result;

// =============================================================================
// Value Objects
// =============================================================================

/// A published group of devices, e.g. one `ResourceSlice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGroup {
    /// Name of the group object
    pub name: String,
    /// Driver that published the group, if known
    pub driver: Option<String>,
    /// Pool the group belongs to, if known
    pub pool: Option<String>,
    /// Devices in publication order
    pub devices: Vec<DeviceDescriptor>,
}

impl DeviceGroup {
    pub fn new(name: impl Into<String>, devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            name: name.into(),
            driver: None,
            pool: None,
            devices,
        }
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }
}

// =============================================================================
// Device Group Source Port
// =============================================================================

/// Port for listing already-published device groups.
///
/// Implementations perform one list call per invocation. Timeouts, retries
/// and pagination are the implementation's concern; a failed call surfaces
/// as [`crate::Error::RemoteUnavailable`].
#[async_trait]
pub trait DeviceGroupSource: Send + Sync {
    /// List every device group visible to this source.
    async fn list_device_groups(&self) -> Result<Vec<DeviceGroup>>;
}

#[async_trait]
impl<T: DeviceGroupSource + ?Sized> DeviceGroupSource for std::sync::Arc<T> {
    async fn list_device_groups(&self) -> Result<Vec<DeviceGroup>> {
        (**self).list_device_groups().await
    }
}
