//! Create and list consignments through the gRPC surface.

use std::time::Duration;

use tonic::transport::Channel;
use tonic::{Code, Request};
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;

use crate::common::*;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_create_then_get_consignments() {
    let (vessel_addr, calls) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;
    let mut client = harness.client().await;

    let response = client
        .create_consignment(consignment("This is a test consignment", 5000, 2))
        .await
        .unwrap()
        .into_inner();

    assert!(response.created);
    let created = response.consignment.unwrap();
    assert_eq!(created.vessel_id, "V1");
    assert_eq!(created.containers.len(), 2);

    let listed = client
        .get_consignments(GetRequest {})
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.consignments, vec![created]);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_heavy_consignment_gets_larger_vessel() {
    let (vessel_addr, _) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;
    let mut client = harness.client().await;

    let response = client
        .create_consignment(consignment("Steel coils", 1_500_000, 3))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.consignment.unwrap().vessel_id, "V2");
}

#[tokio::test]
async fn test_get_consignments_on_empty_store() {
    let (vessel_addr, _) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;
    let mut client = harness.client().await;

    let listed = client
        .get_consignments(GetRequest {})
        .await
        .unwrap()
        .into_inner();

    assert!(listed.consignments.is_empty());
    assert!(!listed.created);
}

#[tokio::test]
async fn test_invalid_consignment_never_reaches_vessel_service() {
    let (vessel_addr, calls) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;
    let mut client = harness.client().await;

    let status = client
        .create_consignment(consignment("Nothing", 0, 0))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(harness.stored().await, 0);
}

#[tokio::test]
async fn test_client_deadline_abandons_lookup() {
    let (vessel_addr, _) = spawn_vessel_service(
        default_fleet(),
        StubBehavior::Delay(Duration::from_secs(3)),
    )
    .await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;
    let mut client = harness.client().await;

    let mut request = Request::new(consignment("Perishables", 5000, 1));
    request.set_timeout(Duration::from_millis(200));
    let status = client.create_consignment(request).await.unwrap_err();

    assert_eq!(status.code(), Code::DeadlineExceeded);
    assert_eq!(harness.stored().await, 0);
}

#[tokio::test]
async fn test_health_reports_serving() {
    let (vessel_addr, _) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, LOOKUP_TIMEOUT).await;

    let channel = Channel::from_shared(format!("http://{}", harness.addr))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut health = HealthClient::new(channel);
    let response = health
        .check(HealthCheckRequest {
            service: "shippy.service.consignment".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.status, ServingStatus::Serving as i32);
}
