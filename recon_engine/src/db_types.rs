use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
/// The merchant's canonical payment status vocabulary. This is what gets written into an order's payment status
/// field. An order whose status has never been written has no `PaymentStatus` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Waiting for the customer to pay.
    Pending,
    /// The payment has been received in full.
    Success,
    /// The payment was cancelled, denied, or expired.
    Failed,
    /// The processor's fraud checks flagged the payment for review.
    Challenge,
}

impl PaymentStatus {
    /// The position of this status in the payment lifecycle. A status may only overwrite another status of equal or
    /// lower rank. The SQL backend binds these values into its conditional update.
    pub fn rank(&self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Challenge => 1,
            Self::Success | Self::Failed => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Challenge => "challenge",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "challenge" => Ok(Self::Challenge),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    /// Total order value in the smallest unit of the merchant's currency
    pub gross_amount: i64,
    pub payment_status: Option<PaymentStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.payment_status.map(|s| s.as_str()).unwrap_or("unset");
        write!(f, "Order {} ({}), amount: {}, payment status: {status}", self.order_id, self.id, self.gross_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub gross_amount: i64,
    pub payment_status: Option<PaymentStatus>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, gross_amount: i64) -> Self {
        Self { order_id, gross_amount, payment_status: None }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }
}
