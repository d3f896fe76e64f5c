//! Shared utilities for integration tests.
//!
//! Runs the shipping service and a stub vessel service in-process on
//! ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Code, Request, Response, Status};

pub use shippy_consignment::proto::consignment::shipping_service_client::ShippingServiceClient;
pub use shippy_consignment::proto::consignment::{Consignment, Container, GetRequest};
use shippy_consignment::proto::consignment::shipping_service_server::ShippingServiceServer;
use shippy_consignment::proto::vessel::vessel_service_server::{VesselService, VesselServiceServer};
use shippy_consignment::proto::vessel::{Response as VesselResponse, Specification, Vessel};
use shippy_consignment::repository::{ConsignmentRepository, InMemoryConsignmentRepository};
use shippy_consignment::services::{ConsignmentOrchestrator, ShippingServiceImpl};
use shippy_consignment::transport::{connect_lazy, grpc_trace_layer};
use shippy_consignment::vessel::GrpcVesselLocator;

/// How the stub vessel service answers.
#[derive(Clone)]
pub enum StubBehavior {
    /// Pick the first vessel in the fleet that satisfies the specification.
    Fleet,
    /// Fail every call with the given code.
    Fail(Code),
    /// Wait, then behave like `Fleet`.
    Delay(Duration),
}

/// In-process vessel service.
pub struct StubVesselService {
    fleet: Vec<Vessel>,
    behavior: StubBehavior,
    calls: Arc<AtomicUsize>,
}

#[tonic::async_trait]
impl VesselService for StubVesselService {
    async fn find_available(
        &self,
        request: Request<Specification>,
    ) -> Result<Response<VesselResponse>, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let spec = request.into_inner();

        match &self.behavior {
            StubBehavior::Fail(code) => return Err(Status::new(*code, "stub failure")),
            StubBehavior::Delay(delay) => tokio::time::sleep(*delay).await,
            StubBehavior::Fleet => {}
        }

        self.fleet
            .iter()
            .find(|v| v.capacity >= spec.capacity && v.max_weight >= spec.max_weight)
            .map(|v| {
                Response::new(VesselResponse {
                    vessel: Some(v.clone()),
                    vessels: vec![],
                })
            })
            .ok_or_else(|| Status::not_found("No vessel found by that spec"))
    }
}

pub fn vessel(id: &str, name: &str, capacity: i32, max_weight: i32) -> Vessel {
    Vessel {
        id: id.to_string(),
        name: name.to_string(),
        capacity,
        max_weight,
        available: true,
        owner_id: "shippy".to_string(),
    }
}

/// Two vessels: a small one (V1) and a large one (V2).
pub fn default_fleet() -> Vec<Vessel> {
    vec![
        vessel("V1", "Boaty McBoatface", 500, 200_000),
        vessel("V2", "Big Bertha", 5_000, 2_000_000),
    ]
}

pub fn container(id: &str) -> Container {
    Container {
        id: id.to_string(),
        customer_id: "cust-001".to_string(),
        origin: "Manchester, United Kingdom".to_string(),
        user_id: "user-001".to_string(),
    }
}

pub fn consignment(description: &str, weight: i32, containers: usize) -> Consignment {
    Consignment {
        description: description.to_string(),
        weight,
        containers: (0..containers).map(|i| container(&format!("c{}", i + 1))).collect(),
        ..Default::default()
    }
}

async fn bind() -> (SocketAddr, TcpListenerStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (addr, TcpListenerStream::new(listener))
}

/// Start a stub vessel service. Returns its address and a call counter.
pub async fn spawn_vessel_service(
    fleet: Vec<Vessel>,
    behavior: StubBehavior,
) -> (SocketAddr, Arc<AtomicUsize>) {
    let (addr, incoming) = bind().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let service = StubVesselService {
        fleet,
        behavior,
        calls: calls.clone(),
    };

    tokio::spawn(async move {
        Server::builder()
            .add_service(VesselServiceServer::new(service))
            .serve_with_incoming(incoming)
            .await
            .unwrap();
    });

    (addr, calls)
}

/// A running shipping service and its backing repository.
pub struct ShippingHarness {
    pub addr: SocketAddr,
    pub repository: Arc<InMemoryConsignmentRepository>,
}

impl ShippingHarness {
    pub async fn client(&self) -> ShippingServiceClient<Channel> {
        ShippingServiceClient::connect(format!("http://{}", self.addr))
            .await
            .unwrap()
    }

    pub async fn stored(&self) -> usize {
        self.repository.get_all().await.unwrap().len()
    }
}

/// Start the shipping service pointed at `vessel_addr`.
pub async fn spawn_shipping_service(
    vessel_addr: SocketAddr,
    lookup_timeout: Duration,
) -> ShippingHarness {
    let channel = connect_lazy(&vessel_addr.to_string()).unwrap();
    let locator = Arc::new(GrpcVesselLocator::new(channel, lookup_timeout));
    let repository = Arc::new(InMemoryConsignmentRepository::new());
    let orchestrator = Arc::new(ConsignmentOrchestrator::new(repository.clone(), locator));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_service_status("shippy.service.consignment", tonic_health::ServingStatus::Serving)
        .await;

    let (addr, incoming) = bind().await;
    tokio::spawn(async move {
        Server::builder()
            .layer(grpc_trace_layer())
            .add_service(health_service)
            .add_service(ShippingServiceServer::new(ShippingServiceImpl::new(orchestrator)))
            .serve_with_incoming(incoming)
            .await
            .unwrap();
    });

    ShippingHarness { addr, repository }
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
