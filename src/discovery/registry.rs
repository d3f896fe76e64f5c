//! Service registry - thread-safe storage of discovered services with connection pooling.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tonic::transport::Channel;
use tracing::{debug, info};

use crate::transport::connect_lazy;

/// A discovered service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: String,
    pub address: String,
    pub port: u16,
}

impl ServiceEndpoint {
    /// Get the full address string for gRPC connection.
    pub fn grpc_address(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}

/// Error types for service registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Service not registered: {0}")]
    ServiceNotFound(String),

    #[error("Invalid address for {name} ({address}): {message}")]
    InvalidAddress {
        name: String,
        address: String,
        message: String,
    },
}

/// Thread-safe service registry with connection pooling.
///
/// Maintains a map of logical name -> endpoint and lazily creates one gRPC
/// channel per service on first request.
#[derive(Default)]
pub struct ServiceRegistry {
    endpoints: RwLock<HashMap<String, ServiceEndpoint>>,
    channels: RwLock<HashMap<String, Channel>>,
}

impl ServiceRegistry {
    /// Create a new empty service registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update or add an endpoint.
    pub async fn update_endpoint(&self, endpoint: ServiceEndpoint) {
        let name = endpoint.name.clone();
        let address = endpoint.grpc_address();

        let mut endpoints = self.endpoints.write().await;
        let endpoint_changed = endpoints
            .get(&name)
            .map(|e| e.grpc_address() != address)
            .unwrap_or(true);

        if endpoint_changed {
            info!(
                service = %name,
                address = %address,
                "Registering service endpoint"
            );

            // Remove stale channel if endpoint changed
            let mut channels = self.channels.write().await;
            if channels.remove(&name).is_some() {
                debug!(service = %name, "Removed stale channel");
            }
            drop(channels);

            endpoints.insert(name, endpoint);
        }
    }


    /// Get or create a channel for the named service.
    ///
    /// Channels connect lazily, so this succeeds even when the service is
    /// currently down; the failure surfaces on the first call instead.
    pub async fn channel(&self, name: &str) -> Result<Channel, RegistryError> {
        {
            let channels = self.channels.read().await;
            if let Some(channel) = channels.get(name) {
                debug!(service = %name, "Using cached channel");
                return Ok(channel.clone());
            }
        }

        let endpoint = self.get_endpoint(name).await?;
        let address = endpoint.grpc_address();
        let channel = connect_lazy(&address).map_err(|e| RegistryError::InvalidAddress {
            name: name.to_string(),
            address: address.clone(),
            message: e.to_string(),
        })?;

        // Another caller may have raced us here; keep whichever landed first
        let mut channels = self.channels.write().await;
        let channel = channels.entry(name.to_string()).or_insert(channel).clone();
        Ok(channel)
    }

    /// Get endpoint for a service (without creating a channel).
    pub async fn get_endpoint(&self, name: &str) -> Result<ServiceEndpoint, RegistryError> {
        self.endpoints
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::ServiceNotFound(name.to_string()))
    }

    /// Get the number of registered endpoints.
    pub async fn len(&self) -> usize {
        self.endpoints.read().await.len()
    }
}
