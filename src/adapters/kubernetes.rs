//! Kubernetes ResourceSlice Adapter
//!
//! Implements the `DeviceGroupSource` port by listing `resource.k8s.io`
//! ResourceSlices, and converts descriptors back into API devices for the
//! advertisement layer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::resource::v1beta1::{
    BasicDevice, Device, DeviceAttribute, DeviceCapacity, ResourceSlice,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as KubeQuantity;
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::{debug, instrument, warn};

use crate::device::{AttributeValue, DeviceDescriptor, Quantity};
use crate::domain::ports::{DeviceGroup, DeviceGroupSource};
use crate::error::Result;

/// Device group source backed by cluster-scoped ResourceSlices.
#[derive(Clone)]
pub struct ResourceSliceSource {
    client: Client,
    driver: Option<String>,
}

impl ResourceSliceSource {
    /// Source listing every ResourceSlice in the cluster.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            driver: None,
        }
    }

    /// Only list slices published by `driver`.
    pub fn for_driver(client: Client, driver: impl Into<String>) -> Self {
        Self {
            client,
            driver: Some(driver.into()),
        }
    }

    fn slices_api(&self) -> Api<ResourceSlice> {
        Api::all(self.client.clone())
    }

    fn list_params(&self) -> ListParams {
        match &self.driver {
            Some(driver) => ListParams::default().fields(&format!("spec.driver={}", driver)),
            None => ListParams::default(),
        }
    }
}

impl std::fmt::Debug for ResourceSliceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSliceSource")
            .field("driver", &self.driver)
            .finish()
    }
}

#[async_trait]
impl DeviceGroupSource for ResourceSliceSource {
    #[instrument(skip(self), fields(driver = ?self.driver))]
    async fn list_device_groups(&self) -> Result<Vec<DeviceGroup>> {
        let list = self.slices_api().list(&self.list_params()).await?;
        debug!(slices = list.items.len(), "Listed ResourceSlices");

        Ok(list.items.iter().map(slice_to_group).collect())
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Convert a ResourceSlice into a domain device group.
pub fn slice_to_group(slice: &ResourceSlice) -> DeviceGroup {
    let name = slice.metadata.name.clone().unwrap_or_default();
    let devices = slice
        .spec
        .devices
        .iter()
        .flatten()
        .map(device_from_api)
        .collect();

    DeviceGroup::new(name, devices)
        .with_driver(slice.spec.driver.clone())
        .with_pool(slice.spec.pool.name.clone())
}

/// Convert an API device into a descriptor.
///
/// Capacities keep the quantity text exactly as published. Attributes that
/// carry no recognised value, and capacities the API server would itself
/// reject, are skipped with a warning.
pub fn device_from_api(device: &Device) -> DeviceDescriptor {
    let mut builder = DeviceDescriptor::builder(device.name.clone());

    let Some(basic) = &device.basic else {
        return builder.build();
    };

    for (key, attr) in basic.attributes.iter().flatten() {
        match attribute_from_api(attr) {
            Some(value) => builder = builder.attribute(key.clone(), value),
            None => warn!(device = %device.name, attribute = %key, "Skipping attribute without a value"),
        }
    }

    for (key, cap) in basic.capacity.iter().flatten() {
        match Quantity::parse(&cap.value.0) {
            Ok(q) => builder = builder.capacity(key.clone(), q),
            Err(e) => warn!(device = %device.name, capacity = %key, error = %e, "Skipping capacity"),
        }
    }

    builder.build()
}

fn attribute_from_api(attr: &DeviceAttribute) -> Option<AttributeValue> {
    if let Some(v) = attr.int {
        Some(AttributeValue::Int(v))
    } else if let Some(s) = &attr.string {
        Some(AttributeValue::String(s.clone()))
    } else if let Some(v) = &attr.version {
        Some(AttributeValue::Version(v.clone()))
    } else {
        attr.bool.map(AttributeValue::Bool)
    }
}

fn attribute_to_api(value: &AttributeValue) -> DeviceAttribute {
    match value {
        AttributeValue::Int(v) => DeviceAttribute {
            int: Some(*v),
            ..Default::default()
        },
        AttributeValue::String(s) => DeviceAttribute {
            string: Some(s.clone()),
            ..Default::default()
        },
        AttributeValue::Version(v) => DeviceAttribute {
            version: Some(v.clone()),
            ..Default::default()
        },
        AttributeValue::Bool(b) => DeviceAttribute {
            bool: Some(*b),
            ..Default::default()
        },
    }
}

/// Convert a descriptor into an API device ready to publish in a ResourceSlice.
pub fn to_resource_device(descriptor: &DeviceDescriptor) -> Device {
    let attributes: BTreeMap<String, DeviceAttribute> = descriptor
        .attributes()
        .iter()
        .map(|(k, v)| (k.clone(), attribute_to_api(v)))
        .collect();

    let capacity: BTreeMap<String, DeviceCapacity> = descriptor
        .capacity()
        .iter()
        .map(|(k, q)| {
            (
                k.clone(),
                DeviceCapacity {
                    value: KubeQuantity(q.to_string()),
                },
            )
        })
        .collect();

    Device {
        name: descriptor.name().to_string(),
        basic: Some(BasicDevice {
            attributes: Some(attributes),
            capacity: Some(capacity),
            ..Default::default()
        }),
        ..Default::default()
    }
}
