//! Static service configuration.
//!
//! Registers service endpoints from the `discovery.services` config list and
//! from the `SHIPPY_SERVICES` environment variable:
//!
//! ```bash
//! SHIPPY_SERVICES=shippy.service.vessel=vessel:50051,shippy.service.user=user:50051
//! ```

use tracing::{info, warn};

use super::registry::{RegistryError, ServiceEndpoint, ServiceRegistry};
use crate::config::ServiceEntry;

/// Environment variable listing `name=host:port` pairs.
pub const SERVICES_ENV_VAR: &str = "SHIPPY_SERVICES";

/// Port assumed when an address omits one.
const DEFAULT_PORT: u16 = 50051;

/// Register every configured service entry.
///
/// Returns the number of endpoints registered.
pub async fn load_from_config(
    services: &[ServiceEntry],
    registry: &ServiceRegistry,
) -> Result<usize, RegistryError> {
    for entry in services {
        register(&entry.name, &entry.address, registry).await?;
    }
    if !services.is_empty() {
        info!(count = services.len(), "Loaded services from configuration");
    }
    Ok(services.len())
}

/// Register the entries of `SHIPPY_SERVICES`, if set.
///
/// Returns the number of endpoints registered; zero when the variable is absent.
pub async fn load_from_env(registry: &ServiceRegistry) -> Result<usize, RegistryError> {
    match std::env::var(SERVICES_ENV_VAR) {
        Ok(services) => {
            info!("Loading services from {} env var", SERVICES_ENV_VAR);
            parse_services(&services, registry).await
        }
        Err(_) => Ok(0),
    }
}

/// Parse `name1=addr1:port1,name2=addr2:port2`.
async fn parse_services(services: &str, registry: &ServiceRegistry) -> Result<usize, RegistryError> {
    let mut count = 0;

    for pair in services.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let Some((name, address)) = pair.split_once('=') else {
            warn!(entry = %pair, "Invalid {} entry, skipping", SERVICES_ENV_VAR);
            continue;
        };

        register(name.trim(), address.trim(), registry).await?;
        count += 1;
    }

    info!(count = count, "Loaded services from environment");
    Ok(count)
}

async fn register(name: &str, address: &str, registry: &ServiceRegistry) -> Result<(), RegistryError> {
    let (host, port) = parse_address(address).map_err(|message| RegistryError::InvalidAddress {
        name: name.to_string(),
        address: address.to_string(),
        message,
    })?;

    registry
        .update_endpoint(ServiceEndpoint {
            name: name.to_string(),
            address: host,
            port,
        })
        .await;
    Ok(())
}

/// Parse address string "host:port" or "host" (default port 50051).
fn parse_address(addr: &str) -> Result<(String, u16), String> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err("empty address".to_string());
    }

    match addr.rsplit_once(':') {
        None => Ok((addr.to_string(), DEFAULT_PORT)),
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| format!("Invalid port number: {}", port))?;
            if host.is_empty() {
                return Err(format!("Missing host in {}", addr));
            }
            Ok((host.to_string(), port))
        }
    }
}
