//! DRA Inventory - Node-level device discovery for DRA drivers
//!
//! Produces a stable, name-keyed inventory of allocatable devices for a
//! Kubernetes Dynamic Resource Allocation driver to advertise. Devices come
//! from one of two producers:
//!
//! ```text
//!   ResourceSlices ──▶ Inventory Mirror ──────┐
//!                                             ├──▶ AllocatableDevices
//!   NODE_NAME seed ──▶ Deterministic Synthesizer ──┘
//!                          │
//!                          └── Seeded Identity Generator
//! ```
//!
//! The synthesizer never touches hardware. Given the same seed and count it
//! produces byte-identical output on every machine and across restarts.
//!
//! # Modules
//!
//! - [`adapters`] - Infrastructure adapters implementing domain ports
//! - [`config`] - Enumeration configuration
//! - [`device`] - Device descriptors, quantities and the device set
//! - [`discovery`] - Identity generator, synthesizer, mirror and enumerator
//! - [`domain`] - Port traits for external collaborators
//! - [`error`] - Error types

pub mod adapters;
pub mod config;
pub mod device;
pub mod discovery;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use config::InventoryConfig;
pub use device::{AllocatableDevices, AttributeValue, DeviceDescriptor, Quantity};
pub use discovery::{mirror, synthesize, DeviceEnumerator, EnumerationMode};
pub use error::{Error, ErrorKind, Result};
