use recon_common::{FraudStatus, TransactionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db_types::Order;

//--------------------------------------      StatusUpdate     ---------------------------------------------------------
/// The result of [`crate::traits::OrderStore::update_payment_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The status was written. The order is returned as it is after the write.
    Applied(Order),
    /// The order already has a status further along its lifecycle, so nothing was written. The order is returned as
    /// it is in the store.
    Superseded(Order),
}

impl StatusUpdate {
    pub fn order(&self) -> &Order {
        match self {
            Self::Applied(o) | Self::Superseded(o) => o,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

//-------------------------------------- ProcessorStatusSnapshot -------------------------------------------------------
/// The processor's own record of a transaction, as returned by a status lookup. The record is kept verbatim; the
/// accessors pick out the fields the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessorStatusSnapshot(Value);

impl ProcessorStatusSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn order_id(&self) -> Option<&str> {
        self.0["order_id"].as_str()
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.0["transaction_id"].as_str()
    }

    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        self.0["transaction_status"].as_str().map(TransactionStatus::from)
    }

    pub fn fraud_status(&self) -> Option<FraudStatus> {
        self.0["fraud_status"].as_str().map(FraudStatus::from)
    }
}

//--------------------------------------   TransactionIntent   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub order_id: String,
    pub gross_amount: i64,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl TransactionIntent {
    pub fn new(order_id: &str, gross_amount: i64) -> Self {
        Self { order_id: order_id.to_string(), gross_amount, items: vec![], customer: None }
    }

    pub fn with_item(mut self, item: TransactionItem) -> Self {
        self.items.push(item);
        self
    }

    /// The sum of price × quantity over all items, or `None` on overflow.
    pub fn items_total(&self) -> Option<i64> {
        self.items.iter().try_fold(0i64, |acc, item| {
            item.price.checked_mul(i64::from(item.quantity)).and_then(|v| acc.checked_add(v))
        })
    }
}

/// What the processor hands back for a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionToken {
    /// Transactions are identified by the merchant's order id until the customer pays.
    pub transaction_id: String,
    pub token: String,
    pub redirect_url: String,
}
