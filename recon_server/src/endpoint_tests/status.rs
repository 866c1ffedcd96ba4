use actix_web::{http::StatusCode, web, web::ServiceConfig};
use recon_engine::{
    db_types::PaymentStatus,
    traits::{OrderStoreError, ProcessorError, ProcessorStatusSnapshot, StatusUpdate},
    SignatureVerifier,
    StatusQueryApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, order, reconciliation_api},
    mocks::{MockProcessor, MockStore},
};
use crate::routes::TransactionStatusRoute;

fn configure(processor: MockProcessor, store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(TransactionStatusRoute::<MockProcessor, SignatureVerifier, MockStore>::new())
            .app_data(web::Data::new(StatusQueryApi::new(processor)))
            .app_data(web::Data::new(reconciliation_api(store)));
    }
}

fn settled_record() -> Value {
    json!({
        "status_code": "200",
        "transaction_id": "9aed5972-5b6a-401e-894b-a32c91ed1a3a",
        "gross_amount": "10000.00",
        "order_id": "order-1",
        "payment_type": "bank_transfer",
        "transaction_status": "settlement",
        "fraud_status": "accept"
    })
}

fn processor_returning(record: Value) -> MockProcessor {
    let mut processor = MockProcessor::new();
    processor
        .expect_transaction_status()
        .withf(|id| id.as_str() == "order-1")
        .times(1)
        .returning(move |_| Ok(ProcessorStatusSnapshot::new(record.clone())));
    processor
}

fn untouched_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_update_payment_status().never();
    store
}

#[actix_web::test]
async fn status_query_returns_processor_record() {
    let _ = env_logger::try_init().ok();
    let cfg = configure(processor_returning(settled_record()), untouched_store());
    let (status, body) = get_request("/status?order_id=order-1", cfg).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "status": "success", "data": settled_record() }));
}

#[actix_web::test]
async fn order_id_is_trimmed() {
    let _ = env_logger::try_init().ok();
    let cfg = configure(processor_returning(settled_record()), untouched_store());
    let (status, _) = get_request("/status?order_id=%20order-1%20", cfg).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn missing_order_id_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_transaction_status().never();
    let (status, body) = get_request("/status", configure(processor, untouched_store())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("An order id is required"));
}

#[actix_web::test]
async fn processor_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_transaction_status().times(1).returning(|_| Err(ProcessorError::Transport("timed out".into())));
    let (status, body) = get_request("/status?order_id=order-1", configure(processor, untouched_store())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with(r#"{"status":"error""#));
}

#[actix_web::test]
async fn sync_applies_processor_record() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .withf(|id, s| id.as_str() == "order-1" && *s == PaymentStatus::Success)
        .times(1)
        .returning(|id, s| Ok(StatusUpdate::Applied(order(id.as_str(), Some(s)))));
    let cfg = configure(processor_returning(settled_record()), store);
    let (status, body) = get_request("/status?order_id=order-1&sync=true", cfg).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["transaction"], settled_record());
    assert_eq!(
        body["data"]["reconciliation"],
        json!({
            "status": "success",
            "ack": { "order_id": "order-1", "payment_status": "success", "outcome": "applied" }
        })
    );
}

#[actix_web::test]
async fn failed_sync_is_reported_in_the_data() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .times(1)
        .returning(|id, _| Err(OrderStoreError::OrderNotFound(id.clone())));
    let cfg = configure(processor_returning(settled_record()), store);
    let (status, body) = get_request("/status?order_id=order-1&sync=true", cfg).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["reconciliation"]["status"], "error");
    assert!(body["data"]["reconciliation"]["message"].as_str().unwrap().starts_with("Invalid order"));
}

#[actix_web::test]
async fn sync_without_transaction_status_changes_nothing() {
    let _ = env_logger::try_init().ok();
    let record = json!({ "status_code": "404", "status_message": "Transaction doesn't exist.", "order_id": "order-1" });
    let cfg = configure(processor_returning(record), untouched_store());
    let (status, body) = get_request("/status?order_id=order-1&sync=true", cfg).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["reconciliation"]["status"], "error");
}
