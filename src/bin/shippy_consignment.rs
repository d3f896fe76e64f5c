//! shippy-consignment: consignment service
//!
//! Accepts consignments over gRPC, asks the vessel service for a vessel able
//! to carry each one, and stores the assigned consignment.
//!
//! ## Architecture
//! ```text
//! [Client] -> [shippy-consignment] -> [shippy.service.vessel] FindAvailable
//!                     |
//!                     v
//!             [Consignment repository]
//! ```
//!
//! ## Configuration
//! - `--config <path>` / SHIPPY_CONFIG: YAML configuration file
//! - SHIPPY__SERVER__PORT, SHIPPY__STORAGE__TYPE, ...: per-key overrides
//! - SHIPPY_SERVICES: `name=host:port` pairs, e.g.
//!   `shippy.service.vessel=localhost:50052`
//! - SHIPPY_LOG: tracing filter (default `info`)

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::{error, info};

use shippy_consignment::config::Config;
use shippy_consignment::discovery::{self, ServiceRegistry};
use shippy_consignment::proto::consignment::shipping_service_server::ShippingServiceServer;
use shippy_consignment::repository::init_repository;
use shippy_consignment::services::{ConsignmentOrchestrator, ShippingServiceImpl};
use shippy_consignment::transport::{grpc_trace_layer, serve_with_shutdown};
use shippy_consignment::utils::bootstrap::{init_tracing, parse_config_path};
use shippy_consignment::vessel::GrpcVesselLocator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        service = %config.server.service_name,
        version = %config.server.version,
        "Starting consignment service"
    );

    let repository = init_repository(&config.storage).await?;
    info!("Storage initialized");

    let registry = ServiceRegistry::new();
    discovery::load_from_config(&config.discovery.services, &registry).await?;
    discovery::load_from_env(&registry).await?;
    info!(services = registry.len().await, "Service registry loaded");

    let vessel_service = &config.vessel.service_name;
    let channel = registry.channel(vessel_service).await.map_err(|e| {
        error!(
            service = %vessel_service,
            "Vessel service is not registered; set discovery.services or {}",
            discovery::SERVICES_ENV_VAR
        );
        e
    })?;
    let endpoint = registry.get_endpoint(vessel_service).await?;
    info!(
        service = %vessel_service,
        address = %endpoint.grpc_address(),
        timeout_ms = config.vessel.lookup_timeout_ms,
        "Vessel service resolved"
    );

    let vessels = Arc::new(GrpcVesselLocator::new(
        channel,
        config.vessel.lookup_timeout(),
    ));
    let orchestrator = Arc::new(ConsignmentOrchestrator::new(repository, vessels));
    let shipping = ShippingServiceImpl::new(orchestrator);

    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_service_status(&config.server.service_name, tonic_health::ServingStatus::Serving)
        .await;
    health_reporter
        .set_serving::<ShippingServiceServer<ShippingServiceImpl>>()
        .await;

    let router = Server::builder()
        .layer(grpc_trace_layer())
        .add_service(health_service)
        .add_service(ShippingServiceServer::new(shipping));

    let addr: SocketAddr = config.server.addr().parse()?;
    serve_with_shutdown(router, addr, &config.server.service_name, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    })
    .await?;

    Ok(())
}
