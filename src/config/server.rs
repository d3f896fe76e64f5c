//! Server configuration types.

use serde::Deserialize;

use crate::discovery::CONSIGNMENT_SERVICE;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port for the shipping gRPC service.
    pub port: u16,
    /// Logical name this service registers under.
    pub service_name: String,
    /// Version reported at startup.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            service_name: CONSIGNMENT_SERVICE.to_string(),
            version: "latest".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
