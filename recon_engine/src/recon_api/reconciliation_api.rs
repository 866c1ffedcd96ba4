use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{OrderId, PaymentStatus},
    events::{EventProducers, PaymentStatusChangedEvent},
    helpers::{map_status, retry_with_policy, AttemptError, RetryError, RetryPolicy, StatusMapping},
    recon_api::{
        errors::ReconcileError,
        notification_objects::{Ack, UpdateOutcome, VerifiedNotification},
    },
    traits::{NotificationVerifier, OrderStore, OrderStoreError, StatusUpdate},
};

/// `ReconciliationApi` turns processor notifications into payment status writes on the order store.
///
/// For every notification it
/// 1. authenticates the payload with the [`NotificationVerifier`],
/// 2. checks that the order id is usable,
/// 3. maps the processor's transaction and fraud status onto a [`PaymentStatus`],
/// 4. writes the status to the [`OrderStore`], retrying transient failures according to its [`RetryPolicy`],
/// 5. publishes a [`PaymentStatusChangedEvent`] if the write went through.
///
/// Reconciling the same notification twice is harmless. Notifications that would move an order backwards in its
/// lifecycle (a late `pending` after `success`, say) are acknowledged but not written.
pub struct ReconciliationApi<V, S> {
    verifier: V,
    store: S,
    producers: EventProducers,
    retry_policy: RetryPolicy,
}

impl<V, S> Debug for ReconciliationApi<V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<V, S> ReconciliationApi<V, S> {
    pub fn new(verifier: V, store: S, producers: EventProducers) -> Self {
        Self { verifier, store, producers, retry_policy: RetryPolicy::default() }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<V, S> ReconciliationApi<V, S>
where
    V: NotificationVerifier,
    S: OrderStore,
{
    /// Authenticates a raw notification body and applies it to the order it refers to.
    pub async fn reconcile(&self, raw_payload: &[u8]) -> Result<Ack, ReconcileError> {
        let verified = self.verifier.verify(raw_payload).await.map_err(|e| {
            warn!("🔔️ Rejected notification. {e} Body: {}", payload_excerpt(raw_payload));
            ReconcileError::from(e)
        })?;
        self.reconcile_verified(verified).await
    }

    /// Applies a notification that has already been authenticated.
    pub async fn reconcile_verified(&self, verified: VerifiedNotification) -> Result<Ack, ReconcileError> {
        let notification = verified.notification();
        let order_id = notification.order_id().ok_or_else(|| {
            let text = notification.order_id_text();
            warn!("🔔️ Notification has an unusable order id: '{text}'. Body: {}", notification.payload);
            ReconcileError::InvalidOrder(format!("'{text}' is not a valid order id"))
        })?;
        let status = match map_status(&notification.transaction_status, notification.fraud_status.as_ref()) {
            StatusMapping::Mapped(status) => status,
            StatusMapping::NoMapping => {
                warn!(
                    "🔔️ Order {order_id}: transaction status '{}' with fraud status '{}' has no payment status. The \
                     order is left unchanged. Body: {}",
                    notification.transaction_status,
                    notification.fraud_status.as_ref().map(|f| f.as_str()).unwrap_or("none"),
                    notification.payload
                );
                return Err(ReconcileError::UnhandledStatus {
                    order_id,
                    transaction_status: notification.transaction_status.clone(),
                    fraud_status: notification.fraud_status.clone(),
                });
            },
        };
        debug!("🔔️ Order {order_id}: '{}' maps to {status}", notification.transaction_status);
        let update = self.write_status(&order_id, status).await.map_err(|e| {
            if let ReconcileError::PersistenceFailure { .. } = e {
                error!(
                    "🔔️ Order {order_id} needs manual reconciliation to {status}. Notification: {}",
                    notification.payload
                );
            }
            e
        })?;
        let outcome = match update {
            StatusUpdate::Applied(order) => {
                info!("🔔️ Order {order_id} payment status is now {status}");
                let event = PaymentStatusChangedEvent::new(order, notification.payload.clone());
                self.producers.publish_status_changed(event).await;
                UpdateOutcome::Applied
            },
            StatusUpdate::Superseded(order) => {
                warn!(
                    "🔔️ Order {order_id} is already {}. Ignoring the stale {status} notification.",
                    order.payment_status.map(|s| s.as_str()).unwrap_or("unset")
                );
                UpdateOutcome::Superseded { current: order.payment_status }
            },
        };
        Ok(Ack { order_id, payment_status: status, outcome })
    }

    async fn write_status(&self, order_id: &OrderId, status: PaymentStatus) -> Result<StatusUpdate, ReconcileError> {
        let store = &self.store;
        let operation_name = format!("Payment status update for order {order_id}");
        let result = retry_with_policy(&self.retry_policy, &operation_name, OrderStoreError::is_retryable, move || {
            store.update_payment_status(order_id, status)
        })
        .await;
        result.map_err(|e: RetryError<OrderStoreError>| {
            if let AttemptError::Failed(OrderStoreError::OrderNotFound(id)) = &e.last {
                warn!("🔔️ Notification refers to order {id}, which does not exist");
                return ReconcileError::InvalidOrder(format!("Order {id} does not exist"));
            }
            error!("🔔️ Could not save payment status {status} for order {order_id}. {e}");
            ReconcileError::PersistenceFailure { retryable: e.retryable, attempts: e.attempts, cause: e.last.to_string() }
        })
    }
}

const MAX_LOGGED_BODY: usize = 2048;

/// The body as text for logging, cut short if it is very long.
fn payload_excerpt(raw_payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw_payload);
    if text.len() <= MAX_LOGGED_BODY {
        return text.into_owned();
    }
    let mut end = MAX_LOGGED_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… ({} bytes)", &text[..end], raw_payload.len())
}
