//! The payment processor's status vocabulary.
//!
//! These are the raw values reported by the processor in the `transaction_status` and `fraud_status` fields of
//! notifications and status lookups. Values we do not know about are preserved in the `Other` variants rather than
//! rejected, so that callers can decide what to do with them.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    /// Card payment captured. Needs the fraud status to be interpreted.
    Capture,
    /// Funds have been settled.
    Settlement,
    Cancel,
    Deny,
    Expire,
    /// Waiting for the customer to complete payment.
    Pending,
    Other(String),
}

impl From<&str> for TransactionStatus {
    fn from(value: &str) -> Self {
        match value {
            "capture" => Self::Capture,
            "settlement" => Self::Settlement,
            "cancel" => Self::Cancel,
            "deny" => Self::Deny,
            "expire" => Self::Expire,
            "pending" => Self::Pending,
            s => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<TransactionStatus> for String {
    fn from(value: TransactionStatus) -> Self {
        value.as_str().to_string()
    }
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Capture => "capture",
            Self::Settlement => "settlement",
            Self::Cancel => "cancel",
            Self::Deny => "deny",
            Self::Expire => "expire",
            Self::Pending => "pending",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------      FraudStatus      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FraudStatus {
    Accept,
    /// The processor flagged the transaction for manual review.
    Challenge,
    Other(String),
}

impl From<&str> for FraudStatus {
    fn from(value: &str) -> Self {
        match value {
            "accept" => Self::Accept,
            "challenge" => Self::Challenge,
            s => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for FraudStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FraudStatus> for String {
    fn from(value: FraudStatus) -> Self {
        value.as_str().to_string()
    }
}

impl FraudStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accept => "accept",
            Self::Challenge => "challenge",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Display for FraudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
