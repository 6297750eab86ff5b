use actix_web::http::StatusCode;
use order_relay_engine::test_utils::{FakeOrderSource, MemoryProcessedStore};
use relay_common::MinorUnits;
use serde_json::Value;
use vtex_tools::OrderDetail;

use super::helpers::{eventually, TestRelay};
use crate::data_objects::{LogsResponse, StatusResponse};

fn orders() -> FakeOrderSource {
    FakeOrderSource::with_orders(vec![
        OrderDetail::new("A").with_sales_channel("1").with_value(MinorUnits::from(12345)),
        OrderDetail::new("B").with_sales_channel("2"),
    ])
}

#[actix_web::test]
async fn health() {
    let _ = env_logger::try_init().ok();
    let relay = TestRelay::new(orders(), MemoryProcessedStore::default());
    let (status, body) = relay.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn status_of_a_fresh_relay() {
    let _ = env_logger::try_init().ok();
    let relay = TestRelay::new(orders(), MemoryProcessedStore::with_ids(&["X", "Y"]));
    let (status, body) = relay.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    let status: StatusResponse = serde_json::from_str(&body).expect("Invalid status response");
    assert_eq!(status.status, "inactive");
    assert_eq!(status.message, "Relay inactive.");
    assert_eq!(status.processed_count, 2);
    assert_eq!(status.order_status, "ready-for-handling");
    assert_eq!(status.target_sales_channel, "1");
    assert_eq!(status.poll_interval_seconds, 3600);
    assert!(status.last_round.is_none());
}

#[actix_web::test]
async fn start_then_stop() {
    let _ = env_logger::try_init().ok();
    let relay = TestRelay::new(orders(), MemoryProcessedStore::default());
    let (status, body) = relay.post("/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Relay started"}"#);

    let store = relay.store.clone();
    eventually(|| store.save_count() >= 1).await;
    assert_eq!(relay.replicas.created_ids(), vec!["A".to_string()]);

    let (status, body) = relay.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    let status: StatusResponse = serde_json::from_str(&body).expect("Invalid status response");
    assert_eq!(status.status, "active");
    assert_eq!(status.processed_count, 2);

    let (status, body) = relay.post("/start").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["error"], "The relay is already running");

    let (status, _) = relay.post("/stop").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = relay.post("/stop").await;
    assert_eq!(status, StatusCode::CONFLICT);

    relay.worker.shutdown().await;
    assert_eq!(relay.store.saved().to_sorted_vec(), vec!["A".to_string(), "B".to_string()]);

    let (_, body) = relay.get("/status").await;
    let status: StatusResponse = serde_json::from_str(&body).expect("Invalid status response");
    let round = status.last_round.expect("The round was not reported");
    assert_eq!(round.listed, 2);
    assert_eq!(round.replicated, 1);
    assert_eq!(round.skipped, 1);
    assert!(!round.interrupted);
}

#[actix_web::test]
async fn logs_are_cleared_on_start() {
    let _ = env_logger::try_init().ok();
    let relay = TestRelay::new(orders(), MemoryProcessedStore::corrupted());
    // The corrupt store was reported when the worker was created
    let (_, body) = relay.get("/logs").await;
    let logs: LogsResponse = serde_json::from_str(&body).unwrap();
    assert!(logs.lines.iter().any(|l| l.contains("[ERROR]") && l.contains("corrupt")));

    let (status, _) = relay.post("/start").await;
    assert_eq!(status, StatusCode::OK);
    let store = relay.store.clone();
    eventually(|| store.save_count() >= 1).await;
    relay.worker.shutdown().await;

    let (_, body) = relay.get("/logs").await;
    let logs: LogsResponse = serde_json::from_str(&body).unwrap();
    assert!(!logs.lines.iter().any(|l| l.contains("corrupt")));
    assert!(logs.lines[0].ends_with("[INFO] ▶️ Relay started"));
    assert!(logs.lines.iter().any(|l| l.contains("[INFO] 📦️ New order: A")));
    assert!(logs.lines.iter().any(|l| l.contains("Relay stopped")));
}

#[actix_web::test]
async fn misconfigured_relay_cannot_start() {
    let _ = env_logger::try_init().ok();
    let source = orders();
    source.misconfigure("Missing VTEX_APP_KEY, VTEX_APP_TOKEN");
    let relay = TestRelay::new(source, MemoryProcessedStore::default());

    let (status, body) = relay.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    let status: StatusResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(status.status, "configuration_error");
    assert_eq!(status.message, "Configuration error: Missing VTEX_APP_KEY, VTEX_APP_TOKEN");

    let (status, body) = relay.post("/start").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("misconfigured"));
    assert!(relay.source.list_requests().is_empty());

    let (_, body) = relay.get("/logs").await;
    let logs: LogsResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(logs.lines.iter().filter(|l| l.contains("[CRITICAL]")).count(), 1);
}
