use cucumber::{given, then, when};
use recon_engine::{
    db_types::{NewOrder, OrderId, PaymentStatus},
    traits::OrderStore,
    ReconcileError,
    UpdateOutcome,
};
use serde_json::json;

use crate::{
    cucumber::{world::ReconSystem, ReconWorld},
    support::{notification_body, signed, SERVER_KEY},
};

fn parse_status(status: &str) -> PaymentStatus {
    status.parse().expect("Not a valid payment status")
}

#[given("a fresh reconciliation engine")]
async fn fresh_engine(world: &mut ReconWorld) {
    world.system = Some(ReconSystem::new().await);
}

#[given(expr = "order '{word}' exists with amount {int}")]
async fn order_exists(world: &mut ReconWorld, order_id: String, amount: i64) {
    let order = NewOrder::new(OrderId::from(order_id), amount);
    let (_, inserted) = world.api().store().insert_order(order).await.expect("Error inserting order");
    assert!(inserted, "Order already existed");
}

#[given(expr = "order '{word}' exists with amount {int} and payment status '{word}'")]
async fn order_exists_with_status(world: &mut ReconWorld, order_id: String, amount: i64, status: String) {
    let order = NewOrder::new(OrderId::from(order_id), amount).with_status(parse_status(&status));
    world.api().store().insert_order(order).await.expect("Error inserting order");
}

#[when(expr = "the processor sends a '{word}' notification for order '{word}'")]
async fn notify(world: &mut ReconWorld, transaction_status: String, order_id: String) {
    let body = signed(&order_id, &transaction_status, None);
    world.last_result = Some(world.api().reconcile(&body).await);
}

#[when(expr = "the processor sends a '{word}' notification with fraud status '{word}' for order '{word}'")]
async fn notify_with_fraud(world: &mut ReconWorld, transaction_status: String, fraud_status: String, order_id: String) {
    let body = signed(&order_id, &transaction_status, Some(&fraud_status));
    world.last_result = Some(world.api().reconcile(&body).await);
}

#[when(expr = "a '{word}' notification for order '{word}' is signed with the wrong key")]
async fn notify_wrong_key(world: &mut ReconWorld, transaction_status: String, order_id: String) {
    let body = notification_body(&order_id, &transaction_status, None, "not-the-server-key");
    let body = serde_json::to_vec(&body).expect("Could not serialize notification");
    world.last_result = Some(world.api().reconcile(&body).await);
}

#[when(expr = "a '{word}' notification for order '{word}' has its amount changed to '{word}'")]
async fn notify_tampered(world: &mut ReconWorld, transaction_status: String, order_id: String, amount: String) {
    let mut body = notification_body(&order_id, &transaction_status, None, SERVER_KEY);
    body["gross_amount"] = json!(amount);
    let body = serde_json::to_vec(&body).expect("Could not serialize notification");
    world.last_result = Some(world.api().reconcile(&body).await);
}

#[when(expr = "the processor sends the body {string}")]
async fn notify_raw(world: &mut ReconWorld, body: String) {
    world.last_result = Some(world.api().reconcile(body.as_bytes()).await);
}

#[then("the notification is acknowledged")]
async fn acknowledged(world: &mut ReconWorld) {
    let ack = world.last_result().as_ref().expect("The notification was rejected");
    assert_eq!(ack.outcome, UpdateOutcome::Applied);
}

#[then(expr = "the notification is acknowledged as stale because the order is already '{word}'")]
async fn acknowledged_stale(world: &mut ReconWorld, current: String) {
    let ack = world.last_result().as_ref().expect("The notification was rejected");
    assert_eq!(ack.outcome, UpdateOutcome::Superseded { current: Some(parse_status(&current)) });
}

#[then(expr = "the notification is rejected as {word}")]
async fn rejected(world: &mut ReconWorld, kind: String) {
    let err = world.last_result().as_ref().expect_err("The notification was accepted");
    let matched = match kind.as_str() {
        "malformed" => matches!(err, ReconcileError::MalformedPayload(_)),
        "unauthenticated" => matches!(err, ReconcileError::Unauthenticated(_)),
        "invalid_order" => matches!(err, ReconcileError::InvalidOrder(_)),
        "unhandled" => matches!(err, ReconcileError::UnhandledStatus { .. }),
        other => panic!("Unknown rejection kind {other}"),
    };
    assert!(matched, "Expected a {kind} rejection, got {err:?}");
    assert!(!err.is_retryable());
}

#[then(expr = "order '{word}' has payment status '{word}'")]
async fn check_status(world: &mut ReconWorld, order_id: String, status: String) {
    let order = world
        .api()
        .store()
        .fetch_order(&OrderId::from(order_id))
        .await
        .expect("Error fetching order")
        .expect("Order does not exist");
    assert_eq!(order.payment_status, Some(parse_status(&status)));
}

#[then(expr = "order '{word}' has no payment status")]
async fn check_no_status(world: &mut ReconWorld, order_id: String) {
    let order = world
        .api()
        .store()
        .fetch_order(&OrderId::from(order_id))
        .await
        .expect("Error fetching order")
        .expect("Order does not exist");
    assert_eq!(order.payment_status, None);
}
