//! Concurrent creates over gRPC.

use std::collections::HashSet;
use std::time::Duration;

use crate::common::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_all_stored_once() {
    const K: usize = 24;
    let (vessel_addr, _) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, Duration::from_secs(5)).await;
    let client = harness.client().await;

    let requests = (0..K).map(|i| {
        let mut client = client.clone();
        async move {
            client
                .create_consignment(consignment(&format!("request-{}", i), 1000 + i as i32, 1))
                .await
                .unwrap()
                .into_inner()
        }
    });
    let responses = futures::future::join_all(requests).await;
    assert!(responses.iter().all(|r| r.created));

    let listed = client
        .clone()
        .get_consignments(GetRequest {})
        .await
        .unwrap()
        .into_inner()
        .consignments;
    assert_eq!(listed.len(), K);

    let descriptions: HashSet<_> = listed.iter().map(|c| c.description.clone()).collect();
    assert_eq!(descriptions.len(), K);
    let ids: HashSet<_> = listed.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), K);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_creates_with_distinct_vessels() {
    let (vessel_addr, _) = spawn_vessel_service(default_fleet(), StubBehavior::Fleet).await;
    let harness = spawn_shipping_service(vessel_addr, Duration::from_secs(5)).await;
    let client = harness.client().await;

    let mut light = client.clone();
    let mut heavy = client.clone();
    let (a, b) = tokio::join!(
        light.create_consignment(consignment("light", 5000, 1)),
        heavy.create_consignment(consignment("heavy", 1_500_000, 1)),
    );
    a.unwrap();
    b.unwrap();

    let listed = client
        .clone()
        .get_consignments(GetRequest {})
        .await
        .unwrap()
        .into_inner()
        .consignments;
    let vessels: HashSet<_> = listed.iter().map(|c| c.vessel_id.as_str()).collect();
    assert_eq!(listed.len(), 2);
    assert_eq!(vessels, HashSet::from(["V1", "V2"]));
}
