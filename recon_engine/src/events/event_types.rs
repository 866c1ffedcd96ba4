use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db_types::{Order, PaymentStatus};

/// Emitted after a notification has changed (or re-confirmed) an order's payment status in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusChangedEvent {
    /// The order as it is after the write.
    pub order: Order,
    /// The notification body that caused the write, as the processor sent it.
    pub notification_payload: Value,
}

impl PaymentStatusChangedEvent {
    pub fn new(order: Order, notification_payload: Value) -> Self {
        Self { order, notification_payload }
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        self.order.payment_status
    }
}
