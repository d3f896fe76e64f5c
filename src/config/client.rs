//! Configuration for outbound services.

use std::time::Duration;

use serde::Deserialize;

use crate::discovery::VESSEL_SERVICE;

/// Vessel service client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Logical name to resolve the vessel service by.
    pub service_name: String,
    /// Upper bound for a single FindAvailable call.
    pub lookup_timeout_ms: u64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            service_name: VESSEL_SERVICE.to_string(),
            lookup_timeout_ms: 5000,
        }
    }
}

impl VesselConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// A statically configured service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceEntry {
    /// Logical service name, e.g. `shippy.service.vessel`.
    pub name: String,
    /// `host:port` or `host` (port 50051).
    pub address: String,
}

/// Statically configured service endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub services: Vec<ServiceEntry>,
}
