//! Domain Layer
//!
//! Port abstractions for the collaborators the inventory talks to.
//!
//! - **Ports** (`ports.rs`) - Trait abstractions for external dependencies

pub mod ports;

pub use ports::{DeviceGroup, DeviceGroupSource};
