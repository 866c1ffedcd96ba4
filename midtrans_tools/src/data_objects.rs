use recon_common::{FraudStatus, TransactionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MidtransApiError;

//--------------------------------------   Snap transactions   ---------------------------------------------------------
/// The body of a Snap `POST /transactions` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub transaction_details: TransactionDetails,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_details: Vec<ItemDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub order_id: String,
    /// Amount in the smallest unit of the merchant's currency. Midtrans does not accept fractional IDR.
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl TransactionRequest {
    pub fn new(order_id: String, gross_amount: i64) -> Self {
        Self {
            transaction_details: TransactionDetails { order_id, gross_amount },
            item_details: vec![],
            customer_details: None,
        }
    }
}

/// The response to a Snap `POST /transactions` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

//--------------------------------------   Transaction status  ---------------------------------------------------------
/// The fields of a Core API status response that we interpret. The full response is kept by callers as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatusResponse {
    pub status_code: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<TransactionStatus>,
    #[serde(default)]
    pub fraud_status: Option<FraudStatus>,
}

impl TransactionStatusResponse {
    pub fn from_value(value: &Value) -> Result<Self, MidtransApiError> {
        serde_json::from_value(value.clone()).map_err(|e| MidtransApiError::JsonError(e.to_string()))
    }

    /// The Core API reports some failures (e.g. unknown orders) with an HTTP 200 and an error code in the body.
    pub fn embedded_error(&self) -> Option<MidtransApiError> {
        let code = self.status_code.parse::<u16>().unwrap_or(0);
        if (400..600).contains(&code) && code != 407 {
            let message = self.status_message.clone().unwrap_or_else(|| "No status message".to_string());
            Some(MidtransApiError::QueryError { status: code, message })
        } else {
            None
        }
    }
}
