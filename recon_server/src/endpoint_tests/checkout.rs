use actix_web::{http::StatusCode, web, web::ServiceConfig};
use recon_engine::{
    db_types::PaymentStatus,
    traits::{OrderStoreError, ProcessorError, TransactionToken},
    CheckoutApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, order, post_request},
    mocks::{MockProcessor, MockStore},
};
use crate::{
    config::ServerOptions,
    routes::{CreateTransactionRoute, OrderByIdRoute},
};

const JSON: Option<&str> = Some("application/json");

fn configure(processor: MockProcessor, store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(OrderByIdRoute::<MockProcessor, MockStore>::new())
            .service(CreateTransactionRoute::<MockProcessor, MockStore>::new())
            .app_data(web::Data::new(CheckoutApi::new(processor, store)))
            .app_data(web::Data::new(ServerOptions::default()));
    }
}

fn request_body() -> Vec<u8> {
    json!({
        "order_id": "order-7",
        "gross_amount": 30000,
        "items": [
            { "id": "sku-1", "name": "Coffee beans", "price": 10000, "quantity": 2 },
            { "name": "Grinder cleaning", "price": 10000, "quantity": 1 }
        ],
        "customer": { "first_name": "Sam", "email": "sam@example.com" }
    })
    .to_string()
    .into_bytes()
}

fn inserting_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_insert_order()
        .withf(|o| o.order_id.as_str() == "order-7" && o.gross_amount == 30000 && o.payment_status == Some(PaymentStatus::Pending))
        .times(1)
        .returning(|o| Ok((order(o.order_id.as_str(), o.payment_status), true)));
    store
}

#[actix_web::test]
async fn create_transaction_returns_token() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_create_transaction().withf(|i| i.items.len() == 2).times(1).returning(|i| {
        Ok(TransactionToken {
            transaction_id: i.order_id.clone(),
            token: "66e4fa55-fdac-4ef9-91b5-733b97d1b862".into(),
            redirect_url: "https://app.sandbox.midtrans.com/snap/v4/redirection/66e4fa55".into(),
        })
    });
    let (status, body) = post_request("/", JSON, request_body(), configure(processor, inserting_store())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "status": "success",
            "data": {
                "token": "66e4fa55-fdac-4ef9-91b5-733b97d1b862",
                "redirect_url": "https://app.sandbox.midtrans.com/snap/v4/redirection/66e4fa55"
            }
        })
    );
}

#[actix_web::test]
async fn item_total_mismatch_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_create_transaction().never();
    let mut store = MockStore::new();
    store.expect_insert_order().never();
    let body = json!({
        "order_id": "order-7",
        "gross_amount": 25000,
        "items": [{ "name": "Coffee beans", "price": 10000, "quantity": 2 }]
    });
    let (status, _) = post_request("/", JSON, body.to_string().into_bytes(), configure(processor, store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unparseable_request_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request("/", JSON, br#"{"order_id": 7}"#.to_vec(), configure(MockProcessor::new(), MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"status":"error""#));
}

#[actix_web::test]
async fn processor_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut processor = MockProcessor::new();
    processor.expect_create_transaction().times(1).returning(|_| {
        Err(ProcessorError::Rejected { status: 401, message: "Unknown merchant server_key/id".into() })
    });
    let (status, _) = post_request("/", JSON, request_body(), configure(processor, inserting_store())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_order()
        .withf(|id| id.as_str() == "order-1")
        .times(1)
        .returning(|id| Ok(Some(order(id.as_str(), Some(PaymentStatus::Challenge)))));
    let (status, body) = get_request("/orders/order-1", configure(MockProcessor::new(), store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"status":"success","data":{"id":1,"order_id":"order-1","gross_amount":10000,"payment_status":"challenge","created_at":"2024-06-01T09:30:00Z","updated_at":"2024-06-01T09:45:00Z"}}"#
    );
}

#[actix_web::test]
async fn fetch_missing_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().times(1).returning(|_| Ok(None));
    let (status, _) = get_request("/orders/order-404", configure(MockProcessor::new(), store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn store_failure_on_fetch_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().times(1).returning(|_| Err(OrderStoreError::DatabaseError("disk I/O error".into())));
    let (status, _) = get_request("/orders/order-1", configure(MockProcessor::new(), store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
