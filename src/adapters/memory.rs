//! In-Memory Device Group Source
//!
//! Implements the `DeviceGroupSource` port over a fixed list of groups.
//! Used by tests and by demo setups that have no API server.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{DeviceGroup, DeviceGroupSource};
use crate::error::{Error, Result};

/// Fixed-content device group source.
#[derive(Debug, Clone)]
pub struct InMemoryDeviceGroupSource {
    groups: Vec<DeviceGroup>,
    failure: Option<String>,
}

impl InMemoryDeviceGroupSource {
    /// Source that always returns `groups`.
    pub fn new(groups: Vec<DeviceGroup>) -> Self {
        Self {
            groups,
            failure: None,
        }
    }

    /// Source whose list call always fails with `RemoteUnavailable`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            groups: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl DeviceGroupSource for InMemoryDeviceGroupSource {
    async fn list_device_groups(&self) -> Result<Vec<DeviceGroup>> {
        if let Some(message) = &self.failure {
            return Err(Error::RemoteUnavailable(kube::Error::Api(
                kube::error::ErrorResponse {
                    status: "Failure".to_string(),
                    message: message.clone(),
                    reason: "ServiceUnavailable".to_string(),
                    code: 503,
                },
            )));
        }

        debug!(groups = self.groups.len(), "Listing in-memory device groups");
        Ok(self.groups.clone())
    }
}
