//! Service discovery for shippy services.
//!
//! Services are addressed by logical name (e.g. `shippy.service.vessel`).
//! The registry maps names to endpoints, populated from configuration and
//! the `SHIPPY_SERVICES` environment variable.

pub mod registry;
pub mod static_config;

pub use registry::{RegistryError, ServiceEndpoint, ServiceRegistry};
pub use static_config::{load_from_config, load_from_env, SERVICES_ENV_VAR};

/// Logical name this service registers under.
pub const CONSIGNMENT_SERVICE: &str = "shippy.service.consignment";

/// Logical name of the vessel service.
pub const VESSEL_SERVICE: &str = "shippy.service.vessel";
