//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports, following the
//! Port/Adapter (Hexagonal) architecture pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Layer                             │
//! │                 DeviceGroupSource (port trait)                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters (This Module)                      │
//! │      ResourceSliceSource │ InMemoryDeviceGroupSource            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use dra_inventory::adapters::ResourceSliceSource;
//! use dra_inventory::discovery::mirror;
//!
//! let source = ResourceSliceSource::for_driver(client, "gpu.example.com");
//! let devices = mirror(&source).await?;
//! ```

mod kubernetes;
mod memory;

pub use kubernetes::{device_from_api, slice_to_group, to_resource_device, ResourceSliceSource};
pub use memory::InMemoryDeviceGroupSource;
