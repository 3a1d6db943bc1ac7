//! Device Data Model
//!
//! Descriptors for allocatable devices and the name-keyed set a single
//! enumeration produces.

mod quantity;

pub use quantity::{Quantity, QuantityUnit};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Attribute Values
// =============================================================================

/// Typed value of a device attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValue {
    /// Integer attribute
    Int(i64),
    /// Free-form string attribute
    String(String),
    /// Semantic version string
    Version(String),
    /// Boolean attribute
    Bool(bool),
}

impl AttributeValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_version(&self) -> Option<&str> {
        match self {
            AttributeValue::Version(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

// =============================================================================
// Device Descriptor
// =============================================================================

/// Attribute/capacity record describing one allocatable device.
///
/// Descriptors are immutable once built; use [`DeviceDescriptor::builder`]
/// to assemble one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    name: String,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    capacity: BTreeMap<String, Quantity>,
}

impl DeviceDescriptor {
    /// Start building a descriptor with the given name.
    pub fn builder(name: impl Into<String>) -> DeviceDescriptorBuilder {
        DeviceDescriptorBuilder {
            descriptor: DeviceDescriptor {
                name: name.into(),
                attributes: BTreeMap::new(),
                capacity: BTreeMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn capacity(&self) -> &BTreeMap<String, Quantity> {
        &self.capacity
    }

    pub fn capacity_of(&self, key: &str) -> Option<&Quantity> {
        self.capacity.get(key)
    }
}

/// Builder for [`DeviceDescriptor`]
#[derive(Debug, Clone)]
pub struct DeviceDescriptorBuilder {
    descriptor: DeviceDescriptor,
}

impl DeviceDescriptorBuilder {
    /// Set an attribute. Setting the same key twice keeps the last value.
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.descriptor.attributes.insert(key.into(), value);
        self
    }

    /// Set a capacity entry. Setting the same key twice keeps the last value.
    pub fn capacity(mut self, key: impl Into<String>, quantity: Quantity) -> Self {
        self.descriptor.capacity.insert(key.into(), quantity);
        self
    }

    pub fn build(self) -> DeviceDescriptor {
        self.descriptor
    }
}

// =============================================================================
// Allocatable Device Set
// =============================================================================

/// Name-keyed collection of descriptors produced by one enumeration call.
///
/// Backed by an ordered map so that equal sets serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocatableDevices(BTreeMap<String, DeviceDescriptor>);

impl AllocatableDevices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor under its own name, returning the one it replaced.
    ///
    /// A descriptor whose name is already present overwrites the earlier entry.
    pub fn insert(&mut self, device: DeviceDescriptor) -> Option<DeviceDescriptor> {
        self.0.insert(device.name.clone(), device)
    }

    pub fn get(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Device names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceDescriptor)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> BTreeMap<String, DeviceDescriptor> {
        self.0
    }
}

impl FromIterator<DeviceDescriptor> for AllocatableDevices {
    fn from_iter<I: IntoIterator<Item = DeviceDescriptor>>(iter: I) -> Self {
        let mut set = Self::new();
        for device in iter {
            set.insert(device);
        }
        set
    }
}

impl IntoIterator for AllocatableDevices {
    type Item = (String, DeviceDescriptor);
    type IntoIter = std::collections::btree_map::IntoIter<String, DeviceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, model: &str) -> DeviceDescriptor {
        DeviceDescriptor::builder(name)
            .attribute("model", AttributeValue::String(model.to_string()))
            .capacity("memory", Quantity::gibibytes(16))
            .build()
    }

    #[test]
    fn test_builder_sets_fields() {
        let d = DeviceDescriptor::builder("gpu-0")
            .attribute("index", AttributeValue::Int(0))
            .attribute("driverVersion", AttributeValue::Version("1.0.0".into()))
            .capacity("memory", Quantity::gibibytes(80))
            .build();

        assert_eq!(d.name(), "gpu-0");
        assert_eq!(d.attribute("index").and_then(AttributeValue::as_int), Some(0));
        assert_eq!(
            d.attribute("driverVersion").and_then(AttributeValue::as_version),
            Some("1.0.0")
        );
        assert_eq!(d.capacity_of("memory"), Some(&Quantity::gibibytes(80)));
        assert!(d.attribute("missing").is_none());
    }

    #[test]
    fn test_attribute_accessors_are_typed() {
        let v = AttributeValue::String("abc".into());
        assert_eq!(v.as_str(), Some("abc"));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.as_version(), None);
        assert_eq!(AttributeValue::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_set_insert_overwrites() {
        let mut set = AllocatableDevices::new();
        assert!(set.insert(device("x", "first")).is_none());
        let replaced = set.insert(device("x", "second"));

        assert_eq!(set.len(), 1);
        assert_eq!(
            replaced.unwrap().attribute("model").and_then(AttributeValue::as_str),
            Some("first")
        );
        assert_eq!(
            set.get("x").unwrap().attribute("model").and_then(AttributeValue::as_str),
            Some("second")
        );
    }

    #[test]
    fn test_set_from_iter_and_names() {
        let set: AllocatableDevices = vec![device("b", "m"), device("a", "m")].into_iter().collect();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(set.contains("a"));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_set_serializes_as_map() {
        let set: AllocatableDevices = std::iter::once(device("gpu-0", "m")).collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["gpu-0"]["name"], "gpu-0");
        assert_eq!(json["gpu-0"]["attributes"]["model"]["string"], "m");
        assert_eq!(json["gpu-0"]["capacity"]["memory"], "16Gi");
    }
}
