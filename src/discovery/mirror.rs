//! Inventory Mirror
//!
//! Republishes devices that some other component already published,
//! flattened into a single name-keyed set.

use tracing::{debug, instrument};

use crate::device::AllocatableDevices;
use crate::domain::ports::DeviceGroupSource;
use crate::error::Result;

/// List all device groups from `source` and flatten them by device name.
///
/// Groups are applied in the order the source returns them, devices in the
/// order their group lists them. When two devices share a name, the later
/// entry overwrites the earlier one, whether they sit in different groups or
/// in the same one. A failed list call returns the error and no set at all.
#[instrument(skip(source))]
pub async fn mirror<S>(source: &S) -> Result<AllocatableDevices>
where
    S: DeviceGroupSource + ?Sized,
{
    let groups = source.list_device_groups().await?;

    let mut all = AllocatableDevices::new();
    for group in groups {
        for device in group.devices {
            let name = device.name().to_string();
            if all.insert(device).is_some() {
                debug!(
                    device = %name,
                    group = %group.name,
                    driver = ?group.driver,
                    pool = ?group.pool,
                    "Device name collision, later entry wins"
                );
            }
        }
    }

    debug!(count = all.len(), "Mirrored published devices");
    Ok(all)
}
