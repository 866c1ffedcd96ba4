use actix_web::{http::StatusCode, web, web::ServiceConfig};
use recon_engine::{
    db_types::PaymentStatus,
    test_utils::notifications::NotificationBuilder,
    traits::{OrderStoreError, StatusUpdate},
    SignatureVerifier,
};

use super::{
    helpers::{get_request, order, post_request, reconciliation_api, SERVER_KEY},
    mocks::MockStore,
};
use crate::{config::ServerOptions, routes::PaymentNotificationRoute};

const JSON: Option<&str> = Some("application/json");

fn configure(store: MockStore, options: ServerOptions) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(PaymentNotificationRoute::<SignatureVerifier, MockStore>::new())
            .app_data(web::Data::new(reconciliation_api(store)))
            .app_data(web::Data::new(options));
    }
}

fn store_expecting(status: PaymentStatus) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .withf(move |id, s| id.as_str() == "order-1" && *s == status)
        .times(1)
        .returning(|id, s| Ok(StatusUpdate::Applied(order(id.as_str(), Some(s)))));
    store
}

fn untouched_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_update_payment_status().never();
    store
}

#[actix_web::test]
async fn settlement_marks_order_paid() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let cfg = configure(store_expecting(PaymentStatus::Success), ServerOptions::default());
    let (status, body) = post_request("/callback", JSON, body, cfg).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"success","message":"Payment status updated successfully"}"#);
}

#[actix_web::test]
async fn fraud_challenge_is_recorded() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "capture").fraud_status("challenge").sign(SERVER_KEY);
    let cfg = configure(store_expecting(PaymentStatus::Challenge), ServerOptions::default());
    let (status, _) = post_request("/callback", JSON, body, cfg).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn stale_notification_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .times(1)
        .returning(|id, _| Ok(StatusUpdate::Superseded(order(id.as_str(), Some(PaymentStatus::Success)))));
    let body = NotificationBuilder::new("order-1", "pending").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(store, ServerOptions::default())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("success"));
}

#[actix_web::test]
async fn wrong_content_type_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let cfg = configure(untouched_store(), ServerOptions::default());
    let (status, body) = post_request("/callback", Some("text/plain"), body, cfg).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"status":"error","message":"Invalid content type"}"#);
}

#[actix_web::test]
async fn missing_content_type_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let (status, _) = post_request("/callback", None, body, configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn content_type_parameters_are_ignored() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let cfg = configure(store_expecting(PaymentStatus::Success), ServerOptions::default());
    let (status, _) = post_request("/callback", Some("Application/JSON; charset=utf-8"), body, cfg).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn lenient_mode_accepts_any_content_type() {
    let _ = env_logger::try_init().ok();
    let options = ServerOptions { strict_content_type: false, ..ServerOptions::default() };
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let cfg = configure(store_expecting(PaymentStatus::Success), options);
    let (status, _) = post_request("/callback", Some("text/plain"), body, cfg).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn malformed_body_is_rejected() {
    let _ = env_logger::try_init().ok();
    let cfg = configure(untouched_store(), ServerOptions::default());
    let (status, body) = post_request("/callback", JSON, b"{not json".to_vec(), cfg).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"status":"error","message":"Malformed notification."#));
}

#[actix_web::test]
async fn empty_body_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _) = post_request("/callback", JSON, vec![], configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn forged_signature_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "settlement").sign("not-the-server-key");
    let (status, body) = post_request("/callback", JSON, body, configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("could not be authenticated"));
}

#[actix_web::test]
async fn blank_order_id_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("   ", "settlement").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid order"));
}

#[actix_web::test]
async fn unknown_order_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .times(1)
        .returning(|id, _| Err(OrderStoreError::OrderNotFound(id.clone())));
    let body = NotificationBuilder::new("order-404", "settlement").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(store, ServerOptions::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid order"));
}

#[actix_web::test]
async fn unmapped_status_is_rejected_by_default() {
    let _ = env_logger::try_init().ok();
    let body = NotificationBuilder::new("order-1", "refund").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No payment status corresponds to transaction status 'refund'"));
}

#[actix_web::test]
async fn unmapped_status_can_be_acknowledged() {
    let _ = env_logger::try_init().ok();
    let options = ServerOptions { ack_unmapped_statuses: true, ..ServerOptions::default() };
    let body = NotificationBuilder::new("order-1", "refund").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(untouched_store(), options)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"success","message":"Notification acknowledged. No payment status change"}"#);
}

#[actix_web::test]
async fn store_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_payment_status()
        .times(2)
        .returning(|_, _| Err(OrderStoreError::DatabaseError("database is locked".into())));
    let body = NotificationBuilder::new("order-1", "settlement").sign(SERVER_KEY);
    let (status, body) = post_request("/callback", JSON, body, configure(store, ServerOptions::default())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("after 2 attempt(s)"));
}

#[actix_web::test]
async fn get_is_not_routed() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("/callback", configure(untouched_store(), ServerOptions::default())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
