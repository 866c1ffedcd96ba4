use std::fmt::Display;

use recon_common::{FraudStatus, TransactionStatus};
use serde::Serialize;
use serde_json::Value;

use crate::{
    db_types::{OrderId, PaymentStatus},
    traits::ProcessorStatusSnapshot,
};

//--------------------------------------      Notification     ---------------------------------------------------------
/// A parsed processor notification. It has not necessarily been authenticated; see [`VerifiedNotification`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// The order id exactly as it appeared in the payload. It is only checked for shape once the notification has
    /// been authenticated.
    pub order_id: Value,
    pub transaction_status: TransactionStatus,
    pub fraud_status: Option<FraudStatus>,
    pub status_code: String,
    pub gross_amount: String,
    pub transaction_id: Option<String>,
    /// The full body, kept for the audit trail.
    pub payload: Value,
}

impl Notification {
    /// The order id exactly as signed, or `None` if it is not a non-empty string. Surrounding whitespace makes an id
    /// unusable rather than being stripped, since the signature covers the padded text.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id.as_str().filter(|s| !s.is_empty() && s.trim() == *s).map(OrderId::from)
    }

    /// The order id as text, the way it is fed into the signature. Strings contribute their contents, anything else
    /// its JSON text.
    pub fn order_id_text(&self) -> String {
        field_text(&self.order_id)
    }
}

pub(crate) fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//--------------------------------------  VerifiedNotification ---------------------------------------------------------
/// A notification that has passed authentication.
///
/// Values of this type can only be made inside this crate, by a [`crate::traits::NotificationVerifier`]
/// implementation, or from a status record fetched from the processor itself. Hence anything holding one can rely on
/// its contents being authentic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VerifiedNotification(Notification);

impl VerifiedNotification {
    pub(crate) fn new(notification: Notification) -> Self {
        Self(notification)
    }

    /// Treats a status record obtained directly from the processor as an authenticated notification.
    ///
    /// Returns `None` if the record has no transaction status.
    pub fn from_snapshot(snapshot: &ProcessorStatusSnapshot) -> Option<Self> {
        let raw = snapshot.as_value();
        let transaction_status = snapshot.transaction_status()?;
        let notification = Notification {
            order_id: raw["order_id"].clone(),
            transaction_status,
            fraud_status: snapshot.fraud_status(),
            status_code: raw["status_code"].as_str().unwrap_or_default().to_string(),
            gross_amount: raw["gross_amount"].as_str().unwrap_or_default().to_string(),
            transaction_id: snapshot.transaction_id().map(String::from),
            payload: raw.clone(),
        };
        Some(Self(notification))
    }

    pub fn notification(&self) -> &Notification {
        &self.0
    }

    pub fn into_inner(self) -> Notification {
        self.0
    }
}

//--------------------------------------          Ack          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The order now carries the notification's status.
    Applied,
    /// The order already had a status further along its lifecycle and was left unchanged.
    Superseded { current: Option<PaymentStatus> },
}

/// A successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub order_id: OrderId,
    /// The status the notification mapped to.
    pub payment_status: PaymentStatus,
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
}

impl Display for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            UpdateOutcome::Applied => write!(f, "Order {} is now {}", self.order_id, self.payment_status),
            UpdateOutcome::Superseded { current } => write!(
                f,
                "Order {} is already {}. Ignored {}",
                self.order_id,
                current.map(|s| s.as_str()).unwrap_or("unset"),
                self.payment_status
            ),
        }
    }
}
